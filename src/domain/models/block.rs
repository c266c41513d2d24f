use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use sqlx::FromRow;

pub const MINUTES_PER_DAY: u32 = 1440;

/// Which barbers a new block applies to. `AllActive` is expanded into one row
/// per active barber when the block is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarberSelector {
    Specific(String),
    AllActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub date_start: NaiveDate,
    pub time_start: NaiveTime,
    pub date_end: NaiveDate,
    pub time_end: NaiveTime,
}

impl BlockRange {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date_start.and_time(self.time_start)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date_end.and_time(self.time_end)
    }

    pub fn is_valid(&self) -> bool {
        self.starts_at() < self.ends_at()
    }

    /// Half-open: ranges that only touch at a boundary do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.starts_at() < end && start < self.ends_at()
    }

    /// Minute-of-day range [start, end) covered on `date`. Days strictly inside
    /// a multi-day range are covered from 00:00 to 24:00.
    pub fn minutes_on(&self, date: NaiveDate) -> Option<(u32, u32)> {
        if date < self.date_start || date > self.date_end {
            return None;
        }
        let start = if date == self.date_start { minute_of_day(self.time_start) } else { 0 };
        let end = if date == self.date_end { minute_of_day(self.time_end) } else { MINUTES_PER_DAY };
        (start < end).then_some((start, end))
    }
}

pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct BlockedInterval {
    pub id: String,
    pub shop_id: String,
    pub barber_id: String,
    pub date_start: NaiveDate,
    pub time_start: NaiveTime,
    pub date_end: NaiveDate,
    pub time_end: NaiveTime,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl BlockedInterval {
    pub fn new(shop_id: &str, barber_id: &str, range: BlockRange, reason: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            barber_id: barber_id.to_string(),
            date_start: range.date_start,
            time_start: range.time_start,
            date_end: range.date_end,
            time_end: range.time_end,
            reason: reason.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn range(&self) -> BlockRange {
        BlockRange {
            date_start: self.date_start,
            time_start: self.time_start,
            date_end: self.date_end,
            time_end: self.time_end,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct BlockDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub block: BlockedInterval,
    pub barber_name: Option<String>,
}

/// A block as submitted in a batch save. Drafts that already carry an id refer
/// to stored rows and are left untouched.
#[derive(Debug, Clone)]
pub struct BlockDraft {
    pub id: Option<String>,
    pub barber: BarberSelector,
    pub range: BlockRange,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(ds: &str, ts: &str, de: &str, te: &str) -> BlockRange {
        BlockRange {
            date_start: ds.parse().unwrap(),
            time_start: NaiveTime::parse_from_str(ts, "%H:%M").unwrap(),
            date_end: de.parse().unwrap(),
            time_end: NaiveTime::parse_from_str(te, "%H:%M").unwrap(),
        }
    }

    #[test]
    fn test_minutes_on_single_day() {
        let r = range("2026-03-02", "08:00", "2026-03-02", "08:30");
        assert_eq!(r.minutes_on("2026-03-02".parse().unwrap()), Some((480, 510)));
        assert_eq!(r.minutes_on("2026-03-03".parse().unwrap()), None);
    }

    #[test]
    fn test_minutes_on_multi_day() {
        let r = range("2026-03-02", "18:00", "2026-03-04", "10:00");
        assert_eq!(r.minutes_on("2026-03-02".parse().unwrap()), Some((1080, 1440)));
        assert_eq!(r.minutes_on("2026-03-03".parse().unwrap()), Some((0, 1440)));
        assert_eq!(r.minutes_on("2026-03-04".parse().unwrap()), Some((0, 600)));
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = range("2026-03-02", "08:00", "2026-03-02", "08:30");
        let b = range("2026-03-02", "08:30", "2026-03-02", "09:00");
        assert!(!a.overlaps(b.starts_at(), b.ends_at()));
        let c = range("2026-03-02", "08:29", "2026-03-02", "09:00");
        assert!(a.overlaps(c.starts_at(), c.ends_at()));
    }
}
