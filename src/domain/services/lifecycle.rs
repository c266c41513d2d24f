use std::sync::Arc;
use chrono::{Duration, NaiveDateTime};
use tracing::{error, info, info_span, Instrument};
use crate::domain::{models::appointment::AppointmentStatus, ports::AppointmentRepository};
use crate::error::AppError;
use crate::state::AppState;
use crate::sync::{publish, ChangeKind};

/// A scheduled appointment this long past its start is presumed attended.
pub const GRACE_PERIOD_HOURS: i64 = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub auto_completed: u64,
    pub purged: u64,
}

pub fn auto_complete_cutoff(now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::hours(GRACE_PERIOD_HOURS)
}

async fn transition(
    repo: &dyn AppointmentRepository,
    shop_id: &str,
    appointment_id: &str,
    status: AppointmentStatus,
) -> Result<(), AppError> {
    // Unconditional overwrite: repeating a transition is a no-op.
    let matched = repo.set_status(shop_id, appointment_id, status).await?;
    if matched == 0 {
        return Err(AppError::NotFound(format!("Appointment {} not found", appointment_id)));
    }
    info!("Appointment {} marked {}", appointment_id, status);
    Ok(())
}

pub async fn complete(repo: &dyn AppointmentRepository, shop_id: &str, appointment_id: &str) -> Result<(), AppError> {
    transition(repo, shop_id, appointment_id, AppointmentStatus::Completed).await
}

pub async fn cancel(repo: &dyn AppointmentRepository, shop_id: &str, appointment_id: &str) -> Result<(), AppError> {
    transition(repo, shop_id, appointment_id, AppointmentStatus::Cancelled).await
}

/// Purges terminal appointments dated before today, then auto-completes
/// stale scheduled ones. Purging first means a row that was scheduled when
/// the pass started is never deleted by that same pass.
pub async fn sweep(repo: &dyn AppointmentRepository, shop_id: &str, now: NaiveDateTime) -> Result<SweepReport, AppError> {
    let purged = repo.purge_terminal_before(shop_id, now.date()).await?;
    let auto_completed = repo.complete_scheduled_before(shop_id, auto_complete_cutoff(now)).await?;
    Ok(SweepReport { auto_completed, purged })
}

/// Runs `sweep` detached from the caller and announces any rows it touched.
/// Failures are logged, never returned.
pub fn spawn_sweep(state: Arc<AppState>, shop_id: String, now: NaiveDateTime) {
    let span = info_span!("sweep", shop_id = %shop_id);
    tokio::spawn(
        async move {
            match sweep(state.appointment_repo.as_ref(), &shop_id, now).await {
                Ok(report) if report != SweepReport::default() => {
                    info!("Sweep completed {} and purged {} appointments", report.auto_completed, report.purged);
                    publish(&state, &shop_id, ChangeKind::Appointments);
                }
                Ok(_) => {}
                Err(e) => error!("Appointment sweep failed: {:?}", e),
            }
        }
        .instrument(span),
    );
}
