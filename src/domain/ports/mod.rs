use crate::domain::models::{
    shop::{Shop, BusinessHours}, user::{AdminUser, ProfilePatch}, service::Service,
    barber::{Barber, BarberWithPeriods, WorkingPeriod}, block::{BlockedInterval, BlockDetail},
    appointment::{Appointment, AppointmentDetail, AppointmentStatus},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Inserts the shop and its first admin in one transaction.
    async fn create_with_admin(&self, shop: &Shop, admin: &AdminUser) -> Result<(Shop, AdminUser), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Shop>, AppError>;
    async fn list_ids(&self) -> Result<Vec<String>, AppError>;
    async fn update_hours(&self, shop_id: &str, hours: &BusinessHours) -> Result<Shop, AppError>;
    /// Drops every stored slot of the shop and inserts `slots`, in one transaction.
    async fn replace_grid(&self, shop_id: &str, interval_minutes: i64, slots: &[NaiveTime]) -> Result<u64, AppError>;
    async fn list_grid(&self, shop_id: &str) -> Result<Vec<NaiveTime>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<AdminUser>, AppError>;
    async fn update_profile(&self, shop_id: &str, id: &str, patch: &ProfilePatch) -> Result<AdminUser, AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn list(&self, shop_id: &str) -> Result<Vec<Service>, AppError>;
    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<Service>, AppError>;
    async fn save_batch(&self, shop_id: &str, services: &[Service], deleted_ids: &[String]) -> Result<(), AppError>;
}

#[async_trait]
pub trait BarberRepository: Send + Sync {
    async fn list_active(&self, shop_id: &str) -> Result<Vec<Barber>, AppError>;
    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<Barber>, AppError>;
    async fn list_periods(&self, shop_id: &str) -> Result<Vec<WorkingPeriod>, AppError>;
    /// Soft-deletes `deleted_ids`, then upserts each barber and replaces its periods.
    async fn save_batch(&self, shop_id: &str, barbers: &[BarberWithPeriods], deleted_ids: &[String]) -> Result<(), AppError>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn list_by_shop(&self, shop_id: &str) -> Result<Vec<BlockDetail>, AppError>;
    /// Blocks whose date span intersects [from, to].
    async fn list_between(&self, shop_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<BlockedInterval>, AppError>;
    /// Deletes first, then inserts, in one transaction.
    async fn replace_batch(&self, shop_id: &str, deleted_ids: &[String], blocks: &[BlockedInterval]) -> Result<u64, AppError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError>;
    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<Appointment>, AppError>;
    async fn list_details(&self, shop_id: &str) -> Result<Vec<AppointmentDetail>, AppError>;
    async fn list_details_by_date(&self, shop_id: &str, date: NaiveDate, statuses: &[AppointmentStatus]) -> Result<Vec<AppointmentDetail>, AppError>;
    async fn list_between(&self, shop_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Appointment>, AppError>;
    /// Single-row status overwrite, no transaction. Returns the number of matched rows.
    async fn set_status(&self, shop_id: &str, id: &str, status: AppointmentStatus) -> Result<u64, AppError>;
    async fn complete_scheduled_before(&self, shop_id: &str, cutoff: NaiveDateTime) -> Result<u64, AppError>;
    async fn purge_terminal_before(&self, shop_id: &str, date: NaiveDate) -> Result<u64, AppError>;
}
