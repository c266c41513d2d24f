use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpdateProfileRequest;
use crate::api::extractors::shop::ShopId;
use crate::domain::models::user::ProfilePatch;
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tracing::info;

/// Applies the request's precedence rules: absent or blank password is left
/// alone, present name/email must be non-blank.
fn to_patch(payload: UpdateProfileRequest) -> Result<ProfilePatch, AppError> {
    let name = match payload.name.map(|n| n.trim().to_string()) {
        Some(n) if n.is_empty() => return Err(AppError::Validation("Name cannot be blank".into())),
        other => other,
    };

    let email = match payload.email.map(|e| e.trim().to_string()) {
        Some(e) if e.is_empty() => return Err(AppError::Validation("Email cannot be blank".into())),
        Some(e) if !e.contains('@') => return Err(AppError::Validation("Email must contain '@'".into())),
        other => other,
    };

    let password_hash = match payload.password.filter(|p| !p.trim().is_empty()) {
        Some(password) => {
            let salt = SaltString::generate(&mut rand::thread_rng());
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|_| AppError::Internal)?
                .to_string();
            Some(hash)
        }
        None => None,
    };

    Ok(ProfilePatch { name, email, password_hash })
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Path((_shop_id, user_id)): Path<(String, String)>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = to_patch(payload)?;

    let user = if patch.is_empty() {
        state.user_repo.find_by_id(&shop_id, &user_id).await?
            .ok_or(AppError::NotFound("User not found".into()))?
    } else {
        let updated = state.user_repo.update_profile(&shop_id, &user_id, &patch).await?;
        info!("Profile updated for user {}", user_id);
        publish(&state, &shop_id, ChangeKind::Profile);
        updated
    };

    Ok(Json(user))
}
