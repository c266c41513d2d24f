use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Barber {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    pub active: bool,
    pub lunch_start: Option<NaiveTime>,
    pub lunch_end: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl Barber {
    pub fn new(shop_id: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shop_id,
            name,
            active: true,
            lunch_start: None,
            lunch_end: None,
            created_at: Utc::now(),
        }
    }

    pub fn lunch(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.lunch_start.zip(self.lunch_end)
    }
}

/// One stored row of a barber's weekly schedule. A weekday holds at most two
/// of these, the halves around lunch.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct WorkingPeriod {
    pub id: String,
    pub shop_id: String,
    pub barber_id: String,
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl WorkingPeriod {
    pub fn new(shop_id: &str, barber_id: &str, weekday: i16, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            barber_id: barber_id.to_string(),
            weekday,
            start_time,
            end_time,
        }
    }
}

/// The logical working window for one weekday, lunch gap not represented.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WorkingWindow {
    pub weekday: i16,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A barber plus the periods to store for it, already split around lunch.
#[derive(Debug, Clone)]
pub struct BarberWithPeriods {
    pub barber: Barber,
    pub periods: Vec<WorkingPeriod>,
}

#[derive(Debug, Serialize, Clone)]
pub struct BarberSchedule {
    #[serde(flatten)]
    pub barber: Barber,
    pub schedule: Vec<WorkingWindow>,
}

/// A barber as submitted in a batch save, before lunch splitting.
#[derive(Debug, Clone)]
pub struct BarberDraft {
    pub id: Option<String>,
    pub name: String,
    pub lunch: Option<(NaiveTime, NaiveTime)>,
    pub schedule: Vec<WorkingWindow>,
}
