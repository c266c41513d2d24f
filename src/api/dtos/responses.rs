use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::{block::BlockedInterval, shop::Shop};
use crate::domain::services::availability::SlotRow;

#[derive(Serialize)]
pub struct ShopCreatedResponse {
    pub shop: Shop,
    pub admin_user_id: String,
    pub admin_email: String,
    pub admin_secret: String,
}

#[derive(Serialize)]
pub struct GridGeneratedResponse {
    pub count: u64,
    pub interval_minutes: i64,
}

#[derive(Serialize)]
pub struct GridResponse {
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct BlocksSavedResponse {
    pub inserted: usize,
    pub blocks: Vec<BlockedInterval>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub barber_id: Option<String>,
    pub slots: Vec<SlotRow>,
}
