use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::domain::models::{appointment::AppointmentDetail, barber::Barber, block::BlockedInterval};
use crate::domain::services::{
    availability::{resolve_slots, AvailabilityQuery, SlotRow},
    statistics::{daily_statistics, DailyStatistics},
};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Today,
    Tomorrow,
    Week,
    All,
}

impl Period {
    /// Week runs from today through today + 7, both inclusive.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::Today => date == today,
            Period::Tomorrow => Some(date) == today.succ_opt(),
            Period::Week => date >= today && date <= today + Duration::days(7),
            Period::All => true,
        }
    }

    /// Only single-day periods have a slot grid to show.
    pub fn single_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Today => Some(today),
            Period::Tomorrow => today.succ_opt(),
            Period::Week | Period::All => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Today => "today",
            Period::Tomorrow => "tomorrow",
            Period::Week => "week",
            Period::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for Period {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(Period::Today),
            "tomorrow" => Ok(Period::Tomorrow),
            "week" => Ok(Period::Week),
            "all" => Ok(Period::All),
            _ => Err(AppError::Validation(format!("Unknown period: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Appointments,
    Slots,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub period: Period,
    pub barber_id: Option<String>,
    pub search: Option<String>,
    pub view: ViewMode,
}

/// Immutable snapshot of everything the dashboard shows. Built once per
/// request or refresh, then handed to `render`.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub now: NaiveDateTime,
    pub filter: DashboardFilter,
    pub grid: Vec<NaiveTime>,
    pub barbers: Vec<Barber>,
    pub appointments: Vec<AppointmentDetail>,
    pub blocks: Vec<BlockedInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum DashboardContent {
    Appointments { appointments: Vec<AppointmentDetail> },
    Slots { date: NaiveDate, slots: Vec<SlotRow> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRender {
    pub period: Period,
    pub barber_id: Option<String>,
    pub barbers: Vec<Barber>,
    #[serde(flatten)]
    pub content: DashboardContent,
    pub statistics: DailyStatistics,
}

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Case-insensitive match on client or barber name. Phone numbers are compared
/// on digits only, and only when the term has any.
pub fn matches_search(detail: &AppointmentDetail, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    let client = detail.appointment.client_name.to_lowercase();
    let barber = detail.barber_name.as_deref().unwrap_or_default().to_lowercase();
    if client.contains(&term) || barber.contains(&term) {
        return true;
    }

    let term_digits = digits(&term);
    let phone_digits = detail.appointment.client_phone.as_deref().map(digits).unwrap_or_default();
    !term_digits.is_empty() && !phone_digits.is_empty() && phone_digits.contains(&term_digits)
}

pub fn render(view: &DashboardView) -> Result<DashboardRender, AppError> {
    let today = view.now.date();
    let filter = &view.filter;

    let content = match filter.view {
        ViewMode::Appointments => {
            let mut appointments: Vec<AppointmentDetail> = view
                .appointments
                .iter()
                .filter(|a| filter.period.contains(a.appointment.appointment_date, today))
                .filter(|a| filter.barber_id.as_ref().is_none_or(|id| &a.appointment.barber_id == id))
                .filter(|a| filter.search.as_deref().is_none_or(|term| matches_search(a, term)))
                .cloned()
                .collect();
            appointments.sort_by_key(|a| (a.appointment.appointment_date, a.appointment.time_start));
            DashboardContent::Appointments { appointments }
        }
        ViewMode::Slots => {
            let date = filter.period.single_day(today).ok_or_else(|| {
                AppError::Validation(format!("The slot view is only available for today or tomorrow, not '{}'", filter.period))
            })?;
            let slots = resolve_slots(&AvailabilityQuery {
                date,
                barber_id: filter.barber_id.as_deref(),
                grid: &view.grid,
                appointments: &view.appointments,
                blocks: &view.blocks,
                now: view.now,
            });
            DashboardContent::Slots { date, slots }
        }
    };

    Ok(DashboardRender {
        period: filter.period,
        barber_id: filter.barber_id.clone(),
        barbers: view.barbers.clone(),
        content,
        statistics: daily_statistics(&view.appointments, today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::appointment::{Appointment, NewAppointmentParams};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn detail(client: &str, phone: Option<&str>, barber: (&str, &str), date: &str, time: &str) -> AppointmentDetail {
        let appointment = Appointment::new(NewAppointmentParams {
            shop_id: "s".into(),
            barber_id: barber.0.into(),
            service_id: "svc".into(),
            service_duration_minutes: 30,
            client_name: client.into(),
            client_phone: phone.map(String::from),
            date: d(date),
            time_start: t(time),
        });
        AppointmentDetail {
            appointment,
            barber_name: Some(barber.1.into()),
            service_name: Some("Cut".into()),
            price_cents: Some(3500),
        }
    }

    fn view(filter: DashboardFilter) -> DashboardView {
        DashboardView {
            now: d("2026-03-02").and_hms_opt(9, 0, 0).unwrap(),
            filter,
            grid: vec![t("09:00"), t("09:30")],
            barbers: vec![],
            appointments: vec![
                detail("Marta Silva", Some("(11) 98765-4321"), ("b1", "Ana"), "2026-03-02", "11:00"),
                detail("João", None, ("b2", "Bruno"), "2026-03-02", "09:30"),
                detail("Pedro", Some("11 5555-0000"), ("b1", "Ana"), "2026-03-03", "10:00"),
                detail("Lia", None, ("b2", "Bruno"), "2026-03-12", "10:00"),
            ],
            blocks: vec![],
        }
    }

    fn clients(render: &DashboardRender) -> Vec<String> {
        match &render.content {
            DashboardContent::Appointments { appointments } => {
                appointments.iter().map(|a| a.appointment.client_name.clone()).collect()
            }
            DashboardContent::Slots { .. } => panic!("expected appointment view"),
        }
    }

    #[test]
    fn test_today_sorted_by_time() {
        let out = render(&view(DashboardFilter::default())).unwrap();
        assert_eq!(clients(&out), vec!["João", "Marta Silva"]);
        assert_eq!(out.statistics.appointment_count, 2);
    }

    #[test]
    fn test_week_includes_seventh_day_but_not_later() {
        let out = render(&view(DashboardFilter { period: Period::Week, ..Default::default() })).unwrap();
        assert_eq!(clients(&out), vec!["João", "Marta Silva", "Pedro"]);
        let out = render(&view(DashboardFilter { period: Period::All, ..Default::default() })).unwrap();
        assert_eq!(clients(&out).len(), 4);
    }

    #[test]
    fn test_search_by_name_barber_and_phone_digits() {
        let search = |term: &str| {
            let filter = DashboardFilter { period: Period::All, search: Some(term.into()), ..Default::default() };
            clients(&render(&view(filter)).unwrap())
        };
        assert_eq!(search("marta"), vec!["Marta Silva"]);
        assert_eq!(search("BRUNO"), vec!["João", "Lia"]);
        assert_eq!(search("98765"), vec!["Marta Silva"]);
        assert_eq!(search("5555-0"), vec!["Pedro"]);
        // No digits in the term must not match every phone number.
        assert!(search("zzz").is_empty());
    }

    #[test]
    fn test_slot_view_requires_single_day() {
        let filter = DashboardFilter { period: Period::Week, view: ViewMode::Slots, ..Default::default() };
        assert!(matches!(render(&view(filter)), Err(AppError::Validation(_))));

        let filter = DashboardFilter { period: Period::Today, view: ViewMode::Slots, ..Default::default() };
        let out = render(&view(filter)).unwrap();
        match out.content {
            DashboardContent::Slots { date, slots } => {
                assert_eq!(date, d("2026-03-02"));
                assert_eq!(slots.len(), 2);
                assert_eq!(slots[1].barber_id.as_deref(), Some("b2"));
            }
            _ => panic!("expected slot view"),
        }
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Tomorrow".parse::<Period>().unwrap(), Period::Tomorrow);
        assert!("month".parse::<Period>().is_err());
    }
}
