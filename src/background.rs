use std::sync::Arc;
use std::time::Duration;
use chrono::Local;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;
use crate::domain::services::lifecycle::{sweep, SweepReport};
use crate::sync::{publish, ChangeKind};

pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting appointment sweep worker (every {}s)...", state.config.sweep_interval_secs);

    loop {
        match state.shop_repo.list_ids().await {
            Ok(shop_ids) => {
                let now = Local::now().naive_local();
                for shop_id in shop_ids {
                    let span = info_span!("sweep", shop_id = %shop_id);

                    async {
                        match sweep(state.appointment_repo.as_ref(), &shop_id, now).await {
                            Ok(report) if report != SweepReport::default() => {
                                info!("Auto-completed {} and purged {} appointments", report.auto_completed, report.purged);
                                publish(&state, &shop_id, ChangeKind::Appointments);
                            }
                            Ok(_) => {}
                            Err(e) => error!("Sweep failed: {:?}", e),
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to list shops for sweep: {:?}", e),
        }
        sleep(Duration::from_secs(state.config.sweep_interval_secs)).await;
    }
}
