use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub weekday_start: i16,
    pub weekday_end: i16,
    pub slot_interval_minutes: Option<i64>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            opening_time: None,
            closing_time: None,
            weekday_start: 1,
            weekday_end: 6,
            slot_interval_minutes: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    pub fn business_hours(&self) -> BusinessHours {
        BusinessHours {
            opening_time: self.opening_time,
            closing_time: self.closing_time,
            weekday_start: self.weekday_start,
            weekday_end: self.weekday_end,
            slot_interval_minutes: self.slot_interval_minutes,
            location: self.location.clone(),
        }
    }
}

/// Shop-wide opening hours. Weekdays are ISO numbers, 1 = Monday .. 7 = Sunday.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BusinessHours {
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
    pub weekday_start: i16,
    pub weekday_end: i16,
    pub slot_interval_minutes: Option<i64>,
    pub location: Option<String>,
}

impl BusinessHours {
    pub fn is_configured(&self) -> bool {
        self.opening_time.is_some() && self.closing_time.is_some()
    }

    /// A range such as 6..=1 wraps over the weekend (Sat, Sun, Mon).
    pub fn allows_weekday(&self, weekday: i16) -> bool {
        if self.weekday_start <= self.weekday_end {
            (self.weekday_start..=self.weekday_end).contains(&weekday)
        } else {
            weekday >= self.weekday_start || weekday <= self.weekday_end
        }
    }

    pub fn contains_window(&self, start: NaiveTime, end: NaiveTime) -> bool {
        match (self.opening_time, self.closing_time) {
            (Some(open), Some(close)) => start >= open && end <= close,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(start: i16, end: i16) -> BusinessHours {
        BusinessHours {
            opening_time: NaiveTime::from_hms_opt(8, 0, 0),
            closing_time: NaiveTime::from_hms_opt(18, 0, 0),
            weekday_start: start,
            weekday_end: end,
            slot_interval_minutes: Some(30),
            location: None,
        }
    }

    #[test]
    fn test_weekday_range_plain_and_wrapping() {
        let weekdays = hours(1, 5);
        assert!(weekdays.allows_weekday(1));
        assert!(weekdays.allows_weekday(5));
        assert!(!weekdays.allows_weekday(6));

        let weekend = hours(6, 1);
        assert!(weekend.allows_weekday(6));
        assert!(weekend.allows_weekday(7));
        assert!(weekend.allows_weekday(1));
        assert!(!weekend.allows_weekday(3));
    }

    #[test]
    fn test_window_must_fit_opening_hours() {
        let h = hours(1, 6);
        let t = |hh| NaiveTime::from_hms_opt(hh, 0, 0).unwrap();
        assert!(h.contains_window(t(9), t(18)));
        assert!(!h.contains_window(t(7), t(12)));
        assert!(!h.contains_window(t(9), t(19)));
    }
}
