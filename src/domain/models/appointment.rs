use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// `scheduled` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }

    /// Cancelled appointments free their slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub shop_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub appointment_date: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewAppointmentParams {
    pub shop_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub service_duration_minutes: i64,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub date: NaiveDate,
    pub time_start: NaiveTime,
}

impl Appointment {
    pub fn new(params: NewAppointmentParams) -> Self {
        let (time_end, _) = params
            .time_start
            .overflowing_add_signed(Duration::minutes(params.service_duration_minutes));

        Self {
            id: Uuid::new_v4().to_string(),
            shop_id: params.shop_id,
            barber_id: params.barber_id,
            service_id: params.service_id,
            client_name: params.client_name,
            client_phone: params.client_phone,
            appointment_date: params.date,
            time_start: params.time_start,
            time_end,
            status: AppointmentStatus::Scheduled.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Rows with an unrecognised status are treated as scheduled.
    pub fn status(&self) -> AppointmentStatus {
        self.status.parse().unwrap_or(AppointmentStatus::Scheduled)
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.time_start)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        if self.time_end > self.time_start {
            self.appointment_date.and_time(self.time_end)
        } else {
            self.starts_at()
        }
    }
}

/// Appointment joined with the names and price shown on the dashboard.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct AppointmentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub appointment: Appointment,
    pub barber_name: Option<String>,
    pub service_name: Option<String>,
    pub price_cents: Option<i64>,
}
