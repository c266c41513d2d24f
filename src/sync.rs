use std::sync::Arc;
use std::time::Duration;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::Config;
use crate::domain::models::shop::Shop;
use crate::domain::services::{
    dashboard::{render, DashboardFilter, DashboardRender, DashboardView},
    time_grid::generate_grid,
};
use crate::error::AppError;
use crate::state::AppState;

pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    BusinessHours,
    Grid,
    Services,
    Barbers,
    Blocks,
    Appointments,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopChange {
    pub shop_id: String,
    pub kind: ChangeKind,
}

/// Fire-and-forget: nobody listening is not an error.
pub fn publish(state: &AppState, shop_id: &str, kind: ChangeKind) {
    let change = ShopChange { shop_id: shop_id.to_string(), kind };
    if state.changes.send(change).is_err() {
        debug!("No sync listeners for shop {} ({:?})", shop_id, kind);
    }
}

/// Persisted grid, or one generated from the shop's hours when nothing was
/// stored yet. Without hours or an interval nothing is bookable.
pub async fn load_grid(state: &AppState, shop: &Shop) -> Result<Vec<NaiveTime>, AppError> {
    let stored = state.shop_repo.list_grid(&shop.id).await?;
    if !stored.is_empty() {
        return Ok(stored);
    }
    match shop.slot_interval_minutes {
        Some(interval) => generate_grid(shop.opening_time, shop.closing_time, interval),
        None => Ok(Vec::new()),
    }
}

/// Reads everything the dashboard needs straight from the store.
pub async fn fetch_view(
    state: &AppState,
    shop_id: &str,
    filter: DashboardFilter,
    now: NaiveDateTime,
) -> Result<DashboardView, AppError> {
    let shop = state.shop_repo.find_by_id(shop_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Shop {} not found", shop_id)))?;

    let today = now.date();
    let grid = load_grid(state, &shop).await?;
    let barbers = state.barber_repo.list_active(shop_id).await?;
    let appointments = state.appointment_repo.list_details(shop_id).await?;
    let blocks = state.block_repo.list_between(shop_id, today, today + ChronoDuration::days(7)).await?;

    Ok(DashboardView { now, filter, grid, barbers, appointments, blocks })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl RefreshPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_secs(config.refresh_interval_secs),
            timeout: Duration::from_secs(config.refresh_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub refreshed_at: NaiveDateTime,
    pub dashboard: DashboardRender,
}

/// Keeps the latest dashboard of one shop published on a watch channel.
/// Refreshes on every tick and on every change published for the shop.
pub struct DashboardSync {
    state: Arc<AppState>,
    shop_id: String,
    filter: DashboardFilter,
    policy: RefreshPolicy,
}

impl DashboardSync {
    pub fn new(state: Arc<AppState>, shop_id: String, filter: DashboardFilter, policy: RefreshPolicy) -> Self {
        Self { state, shop_id, filter, policy }
    }

    pub async fn refresh_once(&self) -> Result<DashboardSnapshot, AppError> {
        let now = Local::now().naive_local();
        let fetch = fetch_view(&self.state, &self.shop_id, self.filter.clone(), now);

        let view = tokio::time::timeout(self.policy.timeout, fetch)
            .await
            .map_err(|_| AppError::InternalWithMsg(format!(
                "Dashboard refresh for shop {} timed out after {:?}",
                self.shop_id, self.policy.timeout
            )))??;

        Ok(DashboardSnapshot { refreshed_at: now, dashboard: render(&view)? })
    }

    /// Runs until every receiver is dropped.
    pub fn spawn(self) -> (watch::Receiver<Option<DashboardSnapshot>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);
        let span = info_span!("dashboard_sync", shop_id = %self.shop_id);
        let handle = tokio::spawn(self.run(tx).instrument(span));
        (rx, handle)
    }

    async fn run(self, tx: watch::Sender<Option<DashboardSnapshot>>) {
        info!("Starting dashboard sync every {:?}", self.policy.interval);
        let mut changes = self.state.changes.subscribe();
        let mut ticker = tokio::time::interval(self.policy.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                change = changes.recv() => match change {
                    Ok(change) if change.shop_id == self.shop_id => {
                        debug!("Refreshing after {:?} change", change.kind);
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Sync listener lagged, {} changes skipped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = tx.closed() => break,
            }

            match self.refresh_once().await {
                Ok(snapshot) => {
                    tx.send_replace(Some(snapshot));
                }
                // The previous snapshot stays published.
                Err(e) => warn!("Dashboard refresh discarded: {}", e),
            }
        }

        info!("Dashboard sync stopped");
    }
}
