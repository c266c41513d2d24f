mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use barbershop_backend::{
    domain::{
        models::{
            appointment::{Appointment, AppointmentStatus, NewAppointmentParams},
            shop::{BusinessHours, Shop},
            user::AdminUser,
        },
        ports::ShopRepository,
        services::dashboard::{DashboardContent, DashboardFilter, Period},
    },
    error::AppError,
    state::AppState,
    sync::{publish, ChangeKind, DashboardSync, RefreshPolicy},
};
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use common::{t, TestApp};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration as StdDuration;

async fn book(app: &TestApp, shop_id: &str, barber_id: &str, service_id: &str, client: &str, phone: &str, date: NaiveDate, time: &str) -> String {
    let appointment = Appointment::new(NewAppointmentParams {
        shop_id: shop_id.to_string(),
        barber_id: barber_id.to_string(),
        service_id: service_id.to_string(),
        service_duration_minutes: 30,
        client_name: client.to_string(),
        client_phone: Some(phone.to_string()),
        date,
        time_start: t(time),
    });
    app.state.appointment_repo.create(&appointment).await.unwrap().id
}

fn clients(body: &Value) -> Vec<String> {
    body["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["client_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_dashboard_filters_and_search() {
    let app = TestApp::new().await;
    let shop = app.open_shop().await;
    let joao = app.add_barber(&shop.shop_id, "João").await;
    let pedro = app.add_barber(&shop.shop_id, "Pedro").await;
    let service = app.add_service(&shop.shop_id, "Corte", 5000).await;
    let today = Local::now().date_naive();
    let tomorrow = today + Duration::days(1);

    book(&app, &shop.shop_id, &joao, &service, "Ana Lima", "(11) 98888-1111", tomorrow, "10:00").await;
    book(&app, &shop.shop_id, &pedro, &service, "Bruno Alves", "(21) 97777-2222", tomorrow, "09:00").await;
    book(&app, &shop.shop_id, &joao, &service, "Clara Dias", "(31) 96666-3333", today + Duration::days(5), "11:00").await;
    book(&app, &shop.shop_id, &pedro, &service, "Davi Rocha", "(41) 95555-4444", today + Duration::days(20), "11:00").await;

    let uri = |query: &str| format!("/api/v1/{}/dashboard?{}", shop.shop_id, query);

    let (status, body) = app.send("GET", &uri("period=tomorrow"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "appointments");
    assert_eq!(body["period"], "tomorrow");
    assert_eq!(clients(&body), vec!["Bruno Alves", "Ana Lima"]);
    assert_eq!(body["barbers"].as_array().unwrap().len(), 2);

    let (_, body) = app.send("GET", &uri("period=week"), None).await;
    assert_eq!(clients(&body).len(), 3);

    let (_, body) = app.send("GET", &uri("period=all"), None).await;
    assert_eq!(clients(&body).len(), 4);

    let (_, body) = app.send("GET", &uri(&format!("period=all&barber_id={}", pedro)), None).await;
    assert_eq!(clients(&body), vec!["Bruno Alves", "Davi Rocha"]);

    let (_, body) = app.send("GET", &uri("period=all&search=clara"), None).await;
    assert_eq!(clients(&body), vec!["Clara Dias"]);

    // Barber names match too.
    let (_, body) = app.send("GET", &uri("period=all&search=PEDRO"), None).await;
    assert_eq!(clients(&body).len(), 2);

    let (_, body) = app.send("GET", &uri("period=all&search=977772222"), None).await;
    assert_eq!(clients(&body), vec!["Bruno Alves"]);

    // A term without digits never matches on phone.
    let (_, body) = app.send("GET", &uri("period=all&search=xyz"), None).await;
    assert!(clients(&body).is_empty());

    let (_, body) = app.send("GET", &uri(""), None).await;
    assert_eq!(body["period"], "today");
    assert!(clients(&body).is_empty());
}

#[tokio::test]
async fn test_dashboard_slot_view() {
    let app = TestApp::new().await;
    let shop = app.open_shop().await;
    let joao = app.add_barber(&shop.shop_id, "João").await;
    let service = app.add_service(&shop.shop_id, "Corte", 5000).await;
    let tomorrow = Local::now().date_naive() + Duration::days(1);

    book(&app, &shop.shop_id, &joao, &service, "Ana Lima", "11988881111", tomorrow, "10:00").await;

    let (status, body) = app.send(
        "GET",
        &format!("/api/v1/{}/dashboard?period=tomorrow&view=slots&barber_id={}", shop.shop_id, joao),
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "slots");
    assert_eq!(body["date"], tomorrow.to_string());

    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 20);
    let ten = slots.iter().find(|s| s["time"] == "10:00").unwrap();
    assert_eq!(ten["status"], "booked");
    assert_eq!(ten["appointment"]["client_name"], "Ana Lima");
    assert_eq!(slots[0]["status"], "free");

    let (status, _) = app.send("GET", &format!("/api/v1/{}/dashboard?period=week&view=slots", shop.shop_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", &format!("/api/v1/{}/dashboard?period=fortnight", shop.shop_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_marks_past_slots_today() {
    let app = TestApp::new().await;
    let shop = app.create_shop().await;
    // A grid covering the whole day, so some slot is always behind the clock.
    let (status, _) = app.send(
        "POST",
        &format!("/api/v1/{}/grid", shop.shop_id),
        Some(serde_json::json!({"interval_minutes": 60, "opening": "00:00", "closing": "23:59"})),
    ).await;
    assert_eq!(status, StatusCode::OK);

    let now = Local::now().time();
    let (status, body) = app.send("GET", &format!("/api/v1/{}/availability", shop.shop_id), None).await;
    assert_eq!(status, StatusCode::OK);

    for slot in body["slots"].as_array().unwrap() {
        let time = NaiveTime::parse_from_str(slot["time"].as_str().unwrap(), "%H:%M").unwrap();
        // Slots right around the current minute may go either way.
        if time + Duration::minutes(1) < now {
            assert_eq!(slot["status"], "past", "slot {}", time);
        } else if time > now + Duration::minutes(1) {
            assert_eq!(slot["status"], "free", "slot {}", time);
        }
    }

    let (status, _) = app.send("GET", &format!("/api/v1/{}/availability?barber_id=ghost", shop.shop_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Shop repository that can be made to stall, to exercise refresh timeouts.
struct SlowShopRepo {
    inner: Arc<dyn ShopRepository>,
    stalled: Arc<AtomicBool>,
}

#[async_trait]
impl ShopRepository for SlowShopRepo {
    async fn create_with_admin(&self, shop: &Shop, admin: &AdminUser) -> Result<(Shop, AdminUser), AppError> {
        self.inner.create_with_admin(shop, admin).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Shop>, AppError> {
        if self.stalled.load(Ordering::SeqCst) {
            tokio::time::sleep(StdDuration::from_secs(5)).await;
        }
        self.inner.find_by_id(id).await
    }

    async fn list_ids(&self) -> Result<Vec<String>, AppError> {
        self.inner.list_ids().await
    }

    async fn update_hours(&self, shop_id: &str, hours: &BusinessHours) -> Result<Shop, AppError> {
        self.inner.update_hours(shop_id, hours).await
    }

    async fn replace_grid(&self, shop_id: &str, interval_minutes: i64, slots: &[NaiveTime]) -> Result<u64, AppError> {
        self.inner.replace_grid(shop_id, interval_minutes, slots).await
    }

    async fn list_grid(&self, shop_id: &str) -> Result<Vec<NaiveTime>, AppError> {
        self.inner.list_grid(shop_id).await
    }
}

fn appointment_count(content: &DashboardContent) -> usize {
    match content {
        DashboardContent::Appointments { appointments } => appointments.len(),
        DashboardContent::Slots { .. } => panic!("expected the appointment view"),
    }
}

#[tokio::test]
async fn test_dashboard_sync_follows_changes_and_survives_timeouts() {
    let app = TestApp::new().await;
    let shop = app.open_shop().await;
    let joao = app.add_barber(&shop.shop_id, "João").await;
    let service = app.add_service(&shop.shop_id, "Corte", 5000).await;
    let tomorrow = Local::now().date_naive() + Duration::days(1);

    let stalled = Arc::new(AtomicBool::new(false));
    let state = Arc::new(AppState {
        shop_repo: Arc::new(SlowShopRepo { inner: app.state.shop_repo.clone(), stalled: stalled.clone() }),
        ..(*app.state).clone()
    });

    let filter = DashboardFilter { period: Period::All, ..Default::default() };
    let policy = RefreshPolicy { interval: StdDuration::from_secs(3600), timeout: StdDuration::from_millis(200) };
    let (mut rx, handle) = DashboardSync::new(state.clone(), shop.shop_id.clone(), filter.clone(), policy).spawn();

    // The first tick fires immediately.
    tokio::time::timeout(StdDuration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    let first = rx.borrow_and_update().clone().unwrap();
    assert_eq!(appointment_count(&first.dashboard.content), 0);

    app.seed_appointment(&shop.shop_id, &joao, &service, tomorrow, t("10:00"), AppointmentStatus::Scheduled).await;
    publish(&state, &shop.shop_id, ChangeKind::Appointments);

    tokio::time::timeout(StdDuration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    let second = rx.borrow_and_update().clone().unwrap();
    assert_eq!(appointment_count(&second.dashboard.content), 1);

    // Changes of other shops are ignored.
    let other = app.create_shop().await;
    publish(&state, &other.shop_id, ChangeKind::Appointments);

    // A refresh that overruns its timeout is discarded.
    stalled.store(true, Ordering::SeqCst);
    app.seed_appointment(&shop.shop_id, &joao, &service, tomorrow, t("11:00"), AppointmentStatus::Scheduled).await;
    publish(&state, &shop.shop_id, ChangeKind::Appointments);

    tokio::time::sleep(StdDuration::from_millis(600)).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(appointment_count(&rx.borrow().as_ref().unwrap().dashboard.content), 1);

    let direct = DashboardSync::new(state.clone(), shop.shop_id.clone(), filter, policy);
    assert!(matches!(direct.refresh_once().await, Err(AppError::InternalWithMsg(_))));

    // Dropping the last receiver stops the loop.
    drop(rx);
    stalled.store(false, Ordering::SeqCst);
    publish(&state, &shop.shop_id, ChangeKind::Appointments);
    tokio::time::timeout(StdDuration::from_secs(5), handle).await.unwrap().unwrap();
}
