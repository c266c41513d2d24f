use axum::{extract::{State, Path}, response::IntoResponse, Json};
use chrono::Local;
use crate::state::AppState;
use crate::api::extractors::shop::ShopId;
use crate::domain::models::appointment::AppointmentStatus;
use crate::domain::services::lifecycle::{self, spawn_sweep};
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    // The sweep runs beside this read and never fails it.
    spawn_sweep(state.clone(), shop_id.clone(), Local::now().naive_local());

    let appointments = state.appointment_repo.list_details(&shop_id).await?;
    Ok(Json(appointments))
}

pub async fn list_today(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let appointments = state.appointment_repo
        .list_details_by_date(&shop_id, today, &[AppointmentStatus::Scheduled, AppointmentStatus::Completed])
        .await?;
    Ok(Json(appointments))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Path((_shop_id, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    lifecycle::complete(state.appointment_repo.as_ref(), &shop_id, &appointment_id).await?;
    publish(&state, &shop_id, ChangeKind::Appointments);
    Ok(Json(serde_json::json!({"status": AppointmentStatus::Completed})))
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Path((_shop_id, appointment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    lifecycle::cancel(state.appointment_repo.as_ref(), &shop_id, &appointment_id).await?;
    publish(&state, &shop_id, ChangeKind::Appointments);
    Ok(Json(serde_json::json!({"status": AppointmentStatus::Cancelled})))
}
