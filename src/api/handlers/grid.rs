use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{parse_optional_time, GenerateGridRequest},
    responses::{GridGeneratedResponse, GridResponse},
};
use crate::api::extractors::shop::ShopId;
use crate::domain::services::time_grid::{format_hhmm, generate_grid as build_grid};
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

pub async fn generate_grid(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<GenerateGridRequest>,
) -> Result<impl IntoResponse, AppError> {
    let opening = parse_optional_time(payload.opening.as_deref(), "opening")?;
    let closing = parse_optional_time(payload.closing.as_deref(), "closing")?;

    let slots = build_grid(opening, closing, payload.interval_minutes)?;
    // The interval is stored on the shop, so it must be usable even when the
    // grid itself comes out empty.
    if payload.interval_minutes <= 0 {
        return Err(AppError::Configuration("Slot interval must be a positive number of minutes".into()));
    }

    let count = state.shop_repo.replace_grid(&shop_id, payload.interval_minutes, &slots).await?;
    info!("Generated {} slots for shop {} every {} minutes", count, shop_id, payload.interval_minutes);
    publish(&state, &shop_id, ChangeKind::Grid);

    Ok(Json(GridGeneratedResponse { count, interval_minutes: payload.interval_minutes }))
}

pub async fn get_grid(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.shop_repo.list_grid(&shop_id).await?;
    Ok(Json(GridResponse { slots: slots.iter().map(format_hhmm).collect() }))
}
