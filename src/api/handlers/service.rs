use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::SaveServicesRequest;
use crate::api::extractors::shop::ShopId;
use crate::domain::models::service::Service;
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_repo.list(&shop_id).await?;
    Ok(Json(services))
}

pub async fn save_services(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<SaveServicesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state.service_repo.list(&shop_id).await?;

    let mut services = Vec::with_capacity(payload.services.len());
    for input in payload.services {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Service name is required".into()));
        }
        if input.price_cents < 0 {
            return Err(AppError::Validation(format!("Price of {} cannot be negative", name)));
        }
        if input.duration_minutes <= 0 {
            return Err(AppError::Validation(format!("Duration of {} must be positive", name)));
        }

        let service = match input.id {
            Some(id) => {
                let mut current = existing.iter().find(|s| s.id == id).cloned()
                    .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))?;
                current.name = name;
                current.price_cents = input.price_cents;
                current.duration_minutes = input.duration_minutes;
                current
            }
            None => Service::new(shop_id.clone(), name, input.price_cents, input.duration_minutes),
        };
        services.push(service);
    }

    state.service_repo.save_batch(&shop_id, &services, &payload.deleted_ids).await?;
    info!("Saved {} services for shop {} ({} deleted)", services.len(), shop_id, payload.deleted_ids.len());
    publish(&state, &shop_id, ChangeKind::Services);

    let services = state.service_repo.list(&shop_id).await?;
    Ok(Json(services))
}
