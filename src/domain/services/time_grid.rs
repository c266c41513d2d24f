use chrono::{Duration, NaiveTime};
use serde::Serializer;
use crate::domain::models::block::{minute_of_day, MINUTES_PER_DAY};
use crate::error::AppError;

/// Slot start times from `opening` (inclusive) to `closing` (exclusive).
///
/// Unset hours mean nothing is bookable and yield an empty grid rather than an
/// error. The interval check only happens once both bounds are known.
pub fn generate_grid(
    opening: Option<NaiveTime>,
    closing: Option<NaiveTime>,
    interval_minutes: i64,
) -> Result<Vec<NaiveTime>, AppError> {
    let (Some(opening), Some(closing)) = (opening, closing) else {
        return Ok(Vec::new());
    };

    if interval_minutes <= 0 {
        return Err(AppError::Configuration("Slot interval must be a positive number of minutes".into()));
    }

    let open_min = minute_of_day(opening) as i64;
    let close_min = minute_of_day(closing) as i64;
    let day_length = if close_min > open_min { close_min - open_min } else { MINUTES_PER_DAY as i64 };
    if interval_minutes > day_length {
        return Err(AppError::Configuration(format!(
            "Slot interval of {} minutes exceeds the business day",
            interval_minutes
        )));
    }

    let mut slots = Vec::new();
    let mut cursor = open_min;
    while cursor < close_min {
        slots.push(opening + Duration::minutes(cursor - open_min));
        cursor += interval_minutes;
    }

    Ok(slots)
}

pub fn format_hhmm(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn serialize_hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hhmm(time))
}
