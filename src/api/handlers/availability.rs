use axum::{extract::{State, Query}, response::IntoResponse, Json};
use chrono::Local;
use crate::state::AppState;
use crate::api::dtos::{
    requests::{parse_date, AvailabilityParams},
    responses::AvailabilityResponse,
};
use crate::api::extractors::shop::ShopId;
use crate::domain::models::appointment::AppointmentStatus;
use crate::domain::services::availability::{resolve_slots, AvailabilityQuery};
use crate::sync::load_grid;
use std::sync::Arc;
use crate::error::AppError;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, AppError> {
    let now = Local::now().naive_local();
    let date = match params.date.as_deref() {
        Some(d) => parse_date(d, "date")?,
        None => now.date(),
    };
    let barber_id = params.barber_id.filter(|id| !id.is_empty());

    if let Some(id) = &barber_id {
        state.barber_repo.find_by_id(&shop_id, id).await?
            .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))?;
    }

    let shop = state.shop_repo.find_by_id(&shop_id).await?
        .ok_or(AppError::NotFound("Shop not found".into()))?;
    let grid = load_grid(&state, &shop).await?;
    let appointments = state.appointment_repo
        .list_details_by_date(&shop_id, date, &[AppointmentStatus::Scheduled, AppointmentStatus::Completed])
        .await?;
    let blocks = state.block_repo.list_between(&shop_id, date, date).await?;

    let slots = resolve_slots(&AvailabilityQuery {
        date,
        barber_id: barber_id.as_deref(),
        grid: &grid,
        appointments: &appointments,
        blocks: &blocks,
        now,
    });

    Ok(Json(AvailabilityResponse { date, barber_id, slots }))
}
