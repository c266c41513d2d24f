use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{parse_optional_time, BusinessHoursRequest, CreateShopRequest},
    responses::ShopCreatedResponse,
};
use crate::api::extractors::shop::ShopId;
use crate::domain::models::{shop::{BusinessHours, Shop}, user::AdminUser};
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use rand::{distributions::Alphanumeric, Rng};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tracing::info;

pub async fn create_shop(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShopRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Shop name is required".into()));
    }

    let requested_email = payload
        .admin_email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    if let Some(email) = &requested_email
        && !email.contains('@')
    {
        return Err(AppError::Validation("Admin email must contain '@'".into()));
    }

    let shop = Shop::new(name);

    let admin_password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(admin_password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let admin_email = requested_email
        .unwrap_or_else(|| format!("admin+{}@barbershop.local", shop.id));

    let admin_name = payload.admin_name.unwrap_or_else(|| "admin".to_string());
    let admin_user = AdminUser::new(shop.id.clone(), admin_name, admin_email, password_hash);

    let (created_shop, admin_user) = state.shop_repo.create_with_admin(&shop, &admin_user).await?;
    info!("Shop created: {}", created_shop.id);

    Ok(Json(ShopCreatedResponse {
        shop: created_shop,
        admin_user_id: admin_user.id,
        admin_email: admin_user.email,
        admin_secret: admin_password,
    }))
}

pub async fn get_business_hours(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let shop = state.shop_repo.find_by_id(&shop_id).await?
        .ok_or(AppError::NotFound("Shop not found".into()))?;

    Ok(Json(shop.business_hours()))
}

pub async fn save_business_hours(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<BusinessHoursRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shop = state.shop_repo.find_by_id(&shop_id).await?
        .ok_or(AppError::NotFound("Shop not found".into()))?;

    let opening_time = parse_optional_time(payload.opening_time.as_deref(), "opening_time")?;
    let closing_time = parse_optional_time(payload.closing_time.as_deref(), "closing_time")?;

    if let (Some(open), Some(close)) = (opening_time, closing_time)
        && open >= close
    {
        return Err(AppError::Validation("Opening time must be before closing time".into()));
    }
    for weekday in [payload.weekday_start, payload.weekday_end] {
        if !(1..=7).contains(&weekday) {
            return Err(AppError::Validation(format!("Invalid weekday {}: expected 1 (Mon) to 7 (Sun)", weekday)));
        }
    }

    let hours = BusinessHours {
        opening_time,
        closing_time,
        weekday_start: payload.weekday_start,
        weekday_end: payload.weekday_end,
        slot_interval_minutes: shop.slot_interval_minutes,
        location: payload.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
    };

    let updated = state.shop_repo.update_hours(&shop_id, &hours).await?;
    info!("Business hours updated for shop {}", shop_id);
    publish(&state, &shop_id, ChangeKind::BusinessHours);

    Ok(Json(updated.business_hours()))
}
