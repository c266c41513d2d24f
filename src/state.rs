use std::sync::Arc;
use tokio::sync::broadcast;
use crate::domain::ports::{
    AppointmentRepository, BarberRepository, BlockRepository, ServiceRepository,
    ShopRepository, UserRepository,
};
use crate::domain::services::blocks::BlockService;
use crate::config::Config;
use crate::sync::ShopChange;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub shop_repo: Arc<dyn ShopRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub barber_repo: Arc<dyn BarberRepository>,
    pub block_repo: Arc<dyn BlockRepository>,
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub block_service: Arc<BlockService>,
    pub changes: broadcast::Sender<ShopChange>,
}
