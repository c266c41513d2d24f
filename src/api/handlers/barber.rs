use axum::{extract::State, response::IntoResponse, Json};
use std::collections::HashMap;
use crate::state::AppState;
use crate::api::dtos::requests::{parse_optional_time, parse_time, BarberInput, SaveBarbersRequest};
use crate::api::extractors::shop::ShopId;
use crate::domain::models::barber::{BarberDraft, BarberSchedule, WorkingPeriod, WorkingWindow};
use crate::domain::services::schedule::{merge_periods, plan_barbers};
use crate::sync::{publish, ChangeKind};
use std::sync::Arc;
use crate::error::AppError;
use tracing::info;

fn to_draft(input: BarberInput) -> Result<BarberDraft, AppError> {
    let lunch_start = parse_optional_time(input.lunch_start.as_deref(), "lunch_start")?;
    let lunch_end = parse_optional_time(input.lunch_end.as_deref(), "lunch_end")?;
    let lunch = match (lunch_start, lunch_end) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => return Err(AppError::Validation(format!("Lunch break of {} needs both start and end", input.name))),
    };

    let schedule = input
        .schedule
        .iter()
        .map(|w| {
            Ok(WorkingWindow {
                weekday: w.weekday,
                start: parse_time(&w.start, "start")?,
                end: parse_time(&w.end, "end")?,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(BarberDraft { id: input.id, name: input.name, lunch, schedule })
}

async fn load_schedules(state: &AppState, shop_id: &str) -> Result<Vec<BarberSchedule>, AppError> {
    let barbers = state.barber_repo.list_active(shop_id).await?;
    let periods = state.barber_repo.list_periods(shop_id).await?;

    let mut by_barber: HashMap<&str, Vec<WorkingPeriod>> = HashMap::new();
    for period in &periods {
        by_barber.entry(period.barber_id.as_str()).or_default().push(period.clone());
    }

    Ok(barbers
        .into_iter()
        .map(|barber| {
            let schedule = by_barber.get(barber.id.as_str()).map(|p| merge_periods(p)).unwrap_or_default();
            BarberSchedule { barber, schedule }
        })
        .collect())
}

pub async fn list_barbers(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_schedules(&state, &shop_id).await?))
}

pub async fn save_barbers(
    State(state): State<Arc<AppState>>,
    ShopId(shop_id): ShopId,
    Json(payload): Json<SaveBarbersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let shop = state.shop_repo.find_by_id(&shop_id).await?
        .ok_or(AppError::NotFound("Shop not found".into()))?;

    let drafts = payload.barbers.into_iter().map(to_draft).collect::<Result<Vec<_>, _>>()?;
    let existing = state.barber_repo.list_active(&shop_id).await?;
    let planned = plan_barbers(&shop_id, drafts, &payload.deleted_ids, &shop.business_hours(), &existing)?;

    state.barber_repo.save_batch(&shop_id, &planned, &payload.deleted_ids).await?;
    info!("Saved {} barbers for shop {} ({} removed)", planned.len(), shop_id, payload.deleted_ids.len());
    publish(&state, &shop_id, ChangeKind::Barbers);

    Ok(Json(load_schedules(&state, &shop_id).await?))
}
