use std::sync::Arc;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;
use crate::domain::{
    models::{
        appointment::{Appointment, AppointmentStatus},
        barber::Barber,
        block::{BarberSelector, BlockDraft, BlockRange, BlockedInterval},
    },
    ports::{AppointmentRepository, BarberRepository, BlockRepository},
};
use crate::error::AppError;

pub const DEFAULT_BLOCK_REASON: &str = "Blocked";
pub const MANUAL_BLOCK_REASON: &str = "Manually blocked";

/// Everything the validation needs to know about the store, loaded up front.
pub struct BlockContext<'a> {
    pub today: NaiveDate,
    pub active_barbers: &'a [Barber],
    pub existing: &'a [BlockedInterval],
    pub appointments: &'a [Appointment],
}

/// Range of a single-slot block: `minutes` long, rolling into the next day if needed.
pub fn single_slot_range(date: NaiveDate, time: NaiveTime, minutes: i64) -> BlockRange {
    let end = date.and_time(time) + Duration::minutes(minutes);
    BlockRange { date_start: date, time_start: time, date_end: end.date(), time_end: end.time() }
}

fn appointment_span(appt: &Appointment) -> (NaiveDateTime, NaiveDateTime) {
    let start = appt.starts_at();
    let end = appt.ends_at().max(start + Duration::minutes(1));
    (start, end)
}

/// Validates new drafts and expands barber selectors into concrete rows.
/// Blocks listed in `deleted_ids` no longer count as conflicts.
pub fn plan_blocks(
    shop_id: &str,
    drafts: &[BlockDraft],
    deleted_ids: &[String],
    ctx: &BlockContext,
) -> Result<Vec<BlockedInterval>, AppError> {
    let mut planned: Vec<BlockedInterval> = Vec::new();

    for draft in drafts.iter().filter(|d| d.id.is_none()) {
        let range = draft.range;
        if !range.is_valid() {
            return Err(AppError::Validation("Block must end after it starts".into()));
        }
        if range.date_start < ctx.today {
            return Err(AppError::Validation(format!("Cannot block a past date ({})", range.date_start)));
        }

        let barber_ids: Vec<&str> = match &draft.barber {
            BarberSelector::Specific(id) => {
                let barber = ctx
                    .active_barbers
                    .iter()
                    .find(|b| &b.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))?;
                vec![barber.id.as_str()]
            }
            BarberSelector::AllActive => ctx.active_barbers.iter().map(|b| b.id.as_str()).collect(),
        };
        if barber_ids.is_empty() {
            return Err(AppError::Validation("There are no active barbers to block".into()));
        }

        let reason = match draft.reason.trim() {
            "" => DEFAULT_BLOCK_REASON,
            r => r,
        };

        for barber_id in barber_ids {
            let clashes_with_block = ctx
                .existing
                .iter()
                .filter(|b| !deleted_ids.contains(&b.id))
                .chain(planned.iter())
                .any(|b| b.barber_id == barber_id && b.range().overlaps(range.starts_at(), range.ends_at()));
            if clashes_with_block {
                return Err(AppError::Conflict(format!(
                    "Barber {} already has a block overlapping {} {}",
                    barber_id, range.date_start, range.time_start
                )));
            }

            let clashes_with_appointment = ctx
                .appointments
                .iter()
                .filter(|a| a.barber_id == barber_id && a.status() == AppointmentStatus::Scheduled)
                .any(|a| {
                    let (start, end) = appointment_span(a);
                    range.overlaps(start, end)
                });
            if clashes_with_appointment {
                return Err(AppError::Conflict(format!(
                    "Barber {} has a scheduled appointment inside the requested block; cancel it first",
                    barber_id
                )));
            }

            planned.push(BlockedInterval::new(shop_id, barber_id, range, reason));
        }
    }

    Ok(planned)
}

pub struct BlockService {
    barber_repo: Arc<dyn BarberRepository>,
    block_repo: Arc<dyn BlockRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
}

impl BlockService {
    pub fn new(
        barber_repo: Arc<dyn BarberRepository>,
        block_repo: Arc<dyn BlockRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self { barber_repo, block_repo, appointment_repo }
    }

    /// Batch replace: deletes `deleted_ids`, then inserts the validated drafts,
    /// all in one transaction. Returns the inserted rows.
    pub async fn save(
        &self,
        shop_id: &str,
        drafts: &[BlockDraft],
        deleted_ids: &[String],
        today: NaiveDate,
    ) -> Result<Vec<BlockedInterval>, AppError> {
        let new_drafts: Vec<&BlockDraft> = drafts.iter().filter(|d| d.id.is_none()).collect();

        let planned = match (
            new_drafts.iter().map(|d| d.range.date_start).min(),
            new_drafts.iter().map(|d| d.range.date_end).max(),
        ) {
            (Some(from), Some(to)) => {
                let active_barbers = self.barber_repo.list_active(shop_id).await?;
                let existing = self.block_repo.list_between(shop_id, from, to).await?;
                let appointments = self.appointment_repo.list_between(shop_id, from, to).await?;
                let ctx = BlockContext {
                    today,
                    active_barbers: &active_barbers,
                    existing: &existing,
                    appointments: &appointments,
                };
                plan_blocks(shop_id, drafts, deleted_ids, &ctx)?
            }
            _ => Vec::new(),
        };

        if planned.is_empty() && deleted_ids.is_empty() {
            return Ok(planned);
        }

        let inserted = self.block_repo.replace_batch(shop_id, deleted_ids, &planned).await?;
        info!("Saved blocks for shop {}: {} inserted, {} deleted", shop_id, inserted, deleted_ids.len());

        Ok(planned)
    }

    pub async fn block_slot(
        &self,
        shop_id: &str,
        barber_id: &str,
        range: BlockRange,
        reason: Option<String>,
        today: NaiveDate,
    ) -> Result<Vec<BlockedInterval>, AppError> {
        let draft = BlockDraft {
            id: None,
            barber: BarberSelector::Specific(barber_id.to_string()),
            range,
            reason: reason.filter(|r| !r.trim().is_empty()).unwrap_or_else(|| MANUAL_BLOCK_REASON.to_string()),
        };
        self.save(shop_id, std::slice::from_ref(&draft), &[], today).await
    }

    pub async fn delete(&self, shop_id: &str, ids: &[String]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.block_repo.replace_batch(shop_id, ids, &[]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::NewAppointmentParams;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range(date: &str, start: &str, end: &str) -> BlockRange {
        BlockRange { date_start: d(date), time_start: t(start), date_end: d(date), time_end: t(end) }
    }

    fn draft(barber: BarberSelector, r: BlockRange) -> BlockDraft {
        BlockDraft { id: None, barber, range: r, reason: String::new() }
    }

    fn barbers() -> Vec<Barber> {
        let mut a = Barber::new("s".into(), "Ana".into());
        a.id = "b1".into();
        let mut b = Barber::new("s".into(), "Bruno".into());
        b.id = "b2".into();
        vec![a, b]
    }

    #[test]
    fn test_overlap_only_conflicts_for_same_barber() {
        let barbers = barbers();
        let existing = vec![BlockedInterval::new("s", "b1", range("2026-03-02", "08:00", "09:00"), "Dentist")];
        let ctx = BlockContext { today: d("2026-03-01"), active_barbers: &barbers, existing: &existing, appointments: &[] };

        let same = draft(BarberSelector::Specific("b1".into()), range("2026-03-02", "08:59", "09:30"));
        assert!(matches!(plan_blocks("s", &[same], &[], &ctx), Err(AppError::Conflict(_))));

        let other = draft(BarberSelector::Specific("b2".into()), range("2026-03-02", "08:00", "09:00"));
        let rows = plan_blocks("s", &[other], &[], &ctx).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reason, DEFAULT_BLOCK_REASON);

        let touching = draft(BarberSelector::Specific("b1".into()), range("2026-03-02", "09:00", "09:30"));
        assert!(plan_blocks("s", &[touching], &[], &ctx).is_ok());
    }

    #[test]
    fn test_deleted_block_no_longer_conflicts() {
        let barbers = barbers();
        let existing = vec![BlockedInterval::new("s", "b1", range("2026-03-02", "08:00", "09:00"), "Old")];
        let ctx = BlockContext { today: d("2026-03-01"), active_barbers: &barbers, existing: &existing, appointments: &[] };
        let replacement = draft(BarberSelector::Specific("b1".into()), range("2026-03-02", "08:00", "09:00"));
        assert!(plan_blocks("s", &[replacement], &[existing[0].id.clone()], &ctx).is_ok());
    }

    #[test]
    fn test_all_active_expands_per_barber() {
        let barbers = barbers();
        let ctx = BlockContext { today: d("2026-03-01"), active_barbers: &barbers, existing: &[], appointments: &[] };
        let rows = plan_blocks("s", &[draft(BarberSelector::AllActive, range("2026-03-02", "12:00", "13:00"))], &[], &ctx).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.barber_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);

        // Two drafts in the same batch also conflict with each other.
        let twice = [
            draft(BarberSelector::AllActive, range("2026-03-02", "12:00", "13:00")),
            draft(BarberSelector::Specific("b2".into()), range("2026-03-02", "12:30", "12:45")),
        ];
        assert!(matches!(plan_blocks("s", &twice, &[], &ctx), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_past_date_and_inverted_range_rejected() {
        let barbers = barbers();
        let ctx = BlockContext { today: d("2026-03-02"), active_barbers: &barbers, existing: &[], appointments: &[] };
        let past = draft(BarberSelector::Specific("b1".into()), range("2026-03-01", "08:00", "09:00"));
        assert!(matches!(plan_blocks("s", &[past], &[], &ctx), Err(AppError::Validation(_))));
        let inverted = draft(BarberSelector::Specific("b1".into()), range("2026-03-02", "09:00", "08:00"));
        assert!(matches!(plan_blocks("s", &[inverted], &[], &ctx), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_scheduled_appointment_blocks_creation() {
        let barbers = barbers();
        let mut appt = Appointment::new(NewAppointmentParams {
            shop_id: "s".into(),
            barber_id: "b1".into(),
            service_id: "svc".into(),
            service_duration_minutes: 30,
            client_name: "Carla".into(),
            client_phone: None,
            date: d("2026-03-02"),
            time_start: t("10:00"),
        });
        let appts = vec![appt.clone()];
        let ctx = BlockContext { today: d("2026-03-01"), active_barbers: &barbers, existing: &[], appointments: &appts };
        let over = draft(BarberSelector::Specific("b1".into()), range("2026-03-02", "09:30", "10:15"));
        assert!(matches!(plan_blocks("s", std::slice::from_ref(&over), &[], &ctx), Err(AppError::Conflict(_))));

        appt.status = AppointmentStatus::Cancelled.as_str().to_string();
        let appts = vec![appt];
        let ctx = BlockContext { today: d("2026-03-01"), active_barbers: &barbers, existing: &[], appointments: &appts };
        assert!(plan_blocks("s", &[over], &[], &ctx).is_ok());
    }

    #[test]
    fn test_single_slot_range_rolls_over_midnight() {
        let r = single_slot_range(d("2026-03-02"), t("23:50"), 20);
        assert_eq!(r.date_end, d("2026-03-03"));
        assert_eq!(r.time_end, t("00:10"));
        assert!(r.is_valid());
    }
}
