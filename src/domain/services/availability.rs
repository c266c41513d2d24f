use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use crate::domain::models::appointment::AppointmentDetail;
use crate::domain::models::block::{minute_of_day, BlockedInterval};
use crate::domain::services::time_grid::serialize_hhmm;

/// Classification of one slot row. Exactly one state per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SlotState {
    Booked { appointment: AppointmentDetail },
    Blocked { block: BlockedInterval },
    Past,
    Free,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotRow {
    #[serde(serialize_with = "serialize_hhmm")]
    pub time: NaiveTime,
    pub barber_id: Option<String>,
    #[serde(flatten)]
    pub state: SlotState,
}

pub struct AvailabilityQuery<'a> {
    pub date: NaiveDate,
    /// `None` renders every barber, possibly several rows per slot.
    pub barber_id: Option<&'a str>,
    pub grid: &'a [NaiveTime],
    pub appointments: &'a [AppointmentDetail],
    pub blocks: &'a [BlockedInterval],
    pub now: NaiveDateTime,
}

/// Block covering `slot` on `date`, using the half-open day-local minute range.
fn covers(block: &BlockedInterval, date: NaiveDate, slot: NaiveTime) -> bool {
    let minute = minute_of_day(slot);
    block
        .range()
        .minutes_on(date)
        .is_some_and(|(start, end)| minute >= start && minute < end)
}

pub fn resolve_slots(query: &AvailabilityQuery) -> Vec<SlotRow> {
    let mut grid = query.grid.to_vec();
    grid.sort();
    grid.dedup();

    let is_today = query.date == query.now.date();
    let now_time = query.now.time();

    let appointments: Vec<&AppointmentDetail> = query
        .appointments
        .iter()
        .filter(|a| a.appointment.appointment_date == query.date)
        .filter(|a| a.appointment.status().occupies_slot())
        .filter(|a| query.barber_id.is_none_or(|id| a.appointment.barber_id == id))
        .collect();

    let blocks: Vec<&BlockedInterval> = query
        .blocks
        .iter()
        .filter(|b| b.range().minutes_on(query.date).is_some())
        .filter(|b| query.barber_id.is_none_or(|id| b.barber_id == id))
        .collect();

    let mut rows = Vec::with_capacity(grid.len());

    for slot in grid {
        let booked: Vec<&AppointmentDetail> = appointments
            .iter()
            .copied()
            .filter(|a| a.appointment.time_start == slot)
            .collect();

        let blocking: Vec<&BlockedInterval> = blocks
            .iter()
            .copied()
            .filter(|b| covers(b, query.date, slot))
            .collect();

        let fallback = if is_today && slot < now_time { SlotState::Past } else { SlotState::Free };

        match query.barber_id {
            Some(barber_id) => {
                let state = if let Some(appt) = booked.first() {
                    SlotState::Booked { appointment: (*appt).clone() }
                } else if let Some(block) = blocking.first() {
                    SlotState::Blocked { block: (*block).clone() }
                } else {
                    fallback
                };
                rows.push(SlotRow { time: slot, barber_id: Some(barber_id.to_string()), state });
            }
            None => {
                // A barber's own appointment hides its block at the same slot;
                // other barbers' blocks still get their own rows.
                for appt in &booked {
                    rows.push(SlotRow {
                        time: slot,
                        barber_id: Some(appt.appointment.barber_id.clone()),
                        state: SlotState::Booked { appointment: (*appt).clone() },
                    });
                }
                for block in &blocking {
                    if booked.iter().any(|a| a.appointment.barber_id == block.barber_id) {
                        continue;
                    }
                    rows.push(SlotRow {
                        time: slot,
                        barber_id: Some(block.barber_id.clone()),
                        state: SlotState::Blocked { block: (*block).clone() },
                    });
                }
                if booked.is_empty() && blocking.is_empty() {
                    rows.push(SlotRow { time: slot, barber_id: None, state: fallback });
                }
            }
        }
    }

    rows
}
