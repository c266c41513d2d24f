use std::collections::{BTreeMap, HashSet};
use chrono::NaiveTime;
use crate::domain::models::barber::{Barber, BarberDraft, BarberWithPeriods, WorkingPeriod, WorkingWindow};
use crate::domain::models::shop::BusinessHours;
use crate::error::AppError;

/// Stores `window` as one period, or as the two halves around lunch when the
/// lunch break lies strictly inside it.
pub fn split_window(
    shop_id: &str,
    barber_id: &str,
    window: &WorkingWindow,
    lunch: Option<(NaiveTime, NaiveTime)>,
) -> Vec<WorkingPeriod> {
    match lunch {
        Some((lunch_start, lunch_end))
            if lunch_start < lunch_end && lunch_start > window.start && lunch_end < window.end =>
        {
            vec![
                WorkingPeriod::new(shop_id, barber_id, window.weekday, window.start, lunch_start),
                WorkingPeriod::new(shop_id, barber_id, window.weekday, lunch_end, window.end),
            ]
        }
        _ => vec![WorkingPeriod::new(shop_id, barber_id, window.weekday, window.start, window.end)],
    }
}

/// Folds stored periods back into one window per weekday. The earliest period
/// is the base and later ones extend its end.
pub fn merge_periods(periods: &[WorkingPeriod]) -> Vec<WorkingWindow> {
    let mut sorted: Vec<&WorkingPeriod> = periods.iter().collect();
    sorted.sort_by_key(|p| (p.weekday, p.start_time));

    let mut merged: BTreeMap<i16, WorkingWindow> = BTreeMap::new();
    for period in sorted {
        merged
            .entry(period.weekday)
            .and_modify(|w| {
                if period.end_time > w.end {
                    w.end = period.end_time;
                }
            })
            .or_insert(WorkingWindow {
                weekday: period.weekday,
                start: period.start_time,
                end: period.end_time,
            });
    }

    merged.into_values().collect()
}

pub fn validate_window(window: &WorkingWindow, hours: &BusinessHours) -> Result<(), AppError> {
    if !(1..=7).contains(&window.weekday) {
        return Err(AppError::Validation(format!("Invalid weekday {}", window.weekday)));
    }
    if window.start >= window.end {
        return Err(AppError::Validation(format!(
            "Working window on weekday {} must end after it starts",
            window.weekday
        )));
    }
    if hours.is_configured() {
        if !hours.allows_weekday(window.weekday) {
            return Err(AppError::Validation(format!(
                "Weekday {} is outside the shop's opening days",
                window.weekday
            )));
        }
        if !hours.contains_window(window.start, window.end) {
            return Err(AppError::Validation(format!(
                "Working window on weekday {} is outside business hours",
                window.weekday
            )));
        }
    }
    Ok(())
}

/// Validates every draft and turns it into the rows to store. Drafts with an
/// id must refer to one of `existing` and must not be deleted in the same batch.
pub fn plan_barbers(
    shop_id: &str,
    drafts: Vec<BarberDraft>,
    deleted_ids: &[String],
    hours: &BusinessHours,
    existing: &[Barber],
) -> Result<Vec<BarberWithPeriods>, AppError> {
    let mut planned = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Barber name is required".into()));
        }

        if let Some((start, end)) = draft.lunch
            && start >= end
        {
            return Err(AppError::Validation(format!("Lunch break of {} must end after it starts", name)));
        }

        let mut seen = HashSet::new();
        for window in &draft.schedule {
            validate_window(window, hours)?;
            if !seen.insert(window.weekday) {
                return Err(AppError::Validation(format!(
                    "Weekday {} appears more than once for {}",
                    window.weekday, name
                )));
            }
        }

        if let Some(id) = &draft.id
            && deleted_ids.contains(id)
        {
            return Err(AppError::Validation(format!("Barber {} cannot be saved and deleted at once", id)));
        }

        let mut barber = match &draft.id {
            Some(id) => existing
                .iter()
                .find(|b| &b.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Barber {} not found", id)))?,
            None => Barber::new(shop_id.to_string(), name.clone()),
        };
        barber.name = name;
        barber.active = true;
        barber.lunch_start = draft.lunch.map(|(s, _)| s);
        barber.lunch_end = draft.lunch.map(|(_, e)| e);

        let periods = draft
            .schedule
            .iter()
            .flat_map(|w| split_window(shop_id, &barber.id, w, draft.lunch))
            .collect();

        planned.push(BarberWithPeriods { barber, periods });
    }

    Ok(planned)
}
