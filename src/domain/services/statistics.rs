use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::appointment::{AppointmentDetail, AppointmentStatus};

/// Aggregates for one day. Money is in cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatistics {
    pub date: NaiveDate,
    /// Scheduled appointments only.
    pub appointment_count: u64,
    /// Scheduled plus completed.
    pub revenue_cents: i64,
    pub average_ticket_cents: i64,
}

pub fn daily_statistics(appointments: &[AppointmentDetail], date: NaiveDate) -> DailyStatistics {
    let mut appointment_count = 0;
    let mut billable = 0i64;
    let mut revenue_cents = 0i64;

    for detail in appointments.iter().filter(|a| a.appointment.appointment_date == date) {
        match detail.appointment.status() {
            AppointmentStatus::Scheduled => {
                appointment_count += 1;
            }
            AppointmentStatus::Completed => {}
            AppointmentStatus::Cancelled => continue,
        }
        billable += 1;
        revenue_cents += detail.price_cents.unwrap_or(0);
    }

    let average_ticket_cents = if billable > 0 {
        (revenue_cents as f64 / billable as f64).round() as i64
    } else {
        0
    };

    DailyStatistics { date, appointment_count, revenue_cents, average_ticket_cents }
}
