use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use crate::domain::models::block::BarberSelector;
use crate::domain::services::dashboard::ViewMode;
use crate::error::AppError;

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {}: expected YYYY-MM-DD", field)))
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(value: &str, field: &str) -> Result<NaiveTime, AppError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid {}: expected HH:MM", field)))
}

/// Missing and blank both mean unset.
pub fn parse_optional_time(value: Option<&str>, field: &str) -> Result<Option<NaiveTime>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_time(v, field).map(Some),
    }
}

#[derive(Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub admin_name: Option<String>,
    pub admin_email: Option<String>,
}

#[derive(Deserialize)]
pub struct BusinessHoursRequest {
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    pub weekday_start: i16,
    pub weekday_end: i16,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateGridRequest {
    pub interval_minutes: i64,
    pub opening: Option<String>,
    pub closing: Option<String>,
}

#[derive(Deserialize)]
pub struct ServiceInput {
    pub id: Option<String>,
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: i64,
}

#[derive(Deserialize)]
pub struct SaveServicesRequest {
    #[serde(default)]
    pub services: Vec<ServiceInput>,
    #[serde(default)]
    pub deleted_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct WorkingWindowInput {
    pub weekday: i16,
    pub start: String,
    pub end: String,
}

#[derive(Deserialize)]
pub struct BarberInput {
    pub id: Option<String>,
    pub name: String,
    pub lunch_start: Option<String>,
    pub lunch_end: Option<String>,
    #[serde(default)]
    pub schedule: Vec<WorkingWindowInput>,
}

#[derive(Deserialize)]
pub struct SaveBarbersRequest {
    #[serde(default)]
    pub barbers: Vec<BarberInput>,
    #[serde(default)]
    pub deleted_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct BlockInput {
    pub id: Option<String>,
    pub barber: BarberSelector,
    pub date_start: String,
    pub time_start: String,
    pub date_end: String,
    pub time_end: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct SaveBlocksRequest {
    #[serde(default)]
    pub blocks: Vec<BlockInput>,
    #[serde(default)]
    pub deleted_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct BlockSlotRequest {
    pub barber_id: String,
    pub date: String,
    pub time: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteBlocksRequest {
    pub ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub date: Option<String>,
    pub barber_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DashboardParams {
    pub period: Option<String>,
    pub barber_id: Option<String>,
    pub search: Option<String>,
    pub view: Option<ViewMode>,
}

/// Absent fields stay untouched. A blank password counts as absent.
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}
