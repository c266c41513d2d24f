use axum::{extract::{State, Query}, response::IntoResponse, Json};
use chrono::Local;
use crate::state::AppState;
use crate::api::dtos::requests::DashboardParams;
use crate::api::extractors::shop::ShopId;
use crate::domain::models::appointment::AppointmentStatus;
use crate::domain::services::{
    dashboard::{render, DashboardFilter, Period},
    statistics::daily_statistics,
};
use crate::sync::fetch_view;
use std::sync::Arc;
use crate::error::AppError;

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let period = match params.period.as_deref() {
        Some(p) if !p.is_empty() => p.parse::<Period>()?,
        _ => Period::default(),
    };
    let filter = DashboardFilter {
        period,
        barber_id: params.barber_id.filter(|id| !id.is_empty()),
        search: params.search.filter(|s| !s.trim().is_empty()),
        view: params.view.unwrap_or_default(),
    };

    let view = fetch_view(&state, &shop_id, filter, Local::now().naive_local()).await?;
    Ok(Json(render(&view)?))
}

pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let appointments = state.appointment_repo
        .list_details_by_date(&shop_id, today, &[AppointmentStatus::Scheduled, AppointmentStatus::Completed])
        .await?;

    Ok(Json(daily_statistics(&appointments, today)))
}
