use barbershop_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::appointment::{Appointment, AppointmentStatus, NewAppointmentParams},
    infra::factory::sqlite_state,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
pub struct TestShop {
    pub shop_id: String,
    pub admin_user_id: String,
    pub admin_email: String,
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            sweep_interval_secs: 3600,
            default_block_minutes: 20,
            refresh_interval_secs: 120,
            refresh_timeout_secs: 10,
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(b) => builder.body(Body::from(b.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, parse_body(response).await)
    }

    #[allow(dead_code)]
    pub async fn create_shop(&self) -> TestShop {
        let (status, body) = self.send("POST", "/api/v1/shops", Some(json!({"name": "Navalha de Ouro"}))).await;
        assert_eq!(status, StatusCode::OK, "shop creation failed: {}", body);

        TestShop {
            shop_id: body["shop"]["id"].as_str().unwrap().to_string(),
            admin_user_id: body["admin_user_id"].as_str().unwrap().to_string(),
            admin_email: body["admin_email"].as_str().unwrap().to_string(),
        }
    }

    /// Configures 08:00-18:00, Mon-Sat and a 30 minute grid.
    #[allow(dead_code)]
    pub async fn open_shop(&self) -> TestShop {
        let shop = self.create_shop().await;
        let (status, _) = self.send(
            "PUT",
            &format!("/api/v1/{}/business-hours", shop.shop_id),
            Some(json!({"opening_time": "08:00", "closing_time": "18:00", "weekday_start": 1, "weekday_end": 6})),
        ).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = self.send(
            "POST",
            &format!("/api/v1/{}/grid", shop.shop_id),
            Some(json!({"interval_minutes": 30, "opening": "08:00", "closing": "18:00"})),
        ).await;
        assert_eq!(status, StatusCode::OK);
        shop
    }

    /// Returns the id of a new barber with no schedule.
    #[allow(dead_code)]
    pub async fn add_barber(&self, shop_id: &str, name: &str) -> String {
        let (status, body) = self.send(
            "POST",
            &format!("/api/v1/{}/barbers", shop_id),
            Some(json!({"barbers": [{"name": name, "schedule": []}], "deleted_ids": []})),
        ).await;
        assert_eq!(status, StatusCode::OK, "barber save failed: {}", body);

        body.as_array().unwrap()
            .iter()
            .find(|b| b["name"] == name)
            .and_then(|b| b["id"].as_str())
            .unwrap()
            .to_string()
    }

    #[allow(dead_code)]
    pub async fn add_service(&self, shop_id: &str, name: &str, price_cents: i64) -> String {
        let (status, body) = self.send(
            "POST",
            &format!("/api/v1/{}/services", shop_id),
            Some(json!({"services": [{"name": name, "price_cents": price_cents, "duration_minutes": 30}]})),
        ).await;
        assert_eq!(status, StatusCode::OK, "service save failed: {}", body);

        body.as_array().unwrap()
            .iter()
            .find(|s| s["name"] == name)
            .and_then(|s| s["id"].as_str())
            .unwrap()
            .to_string()
    }

    /// Inserts an appointment directly, the way the external booking flow would.
    #[allow(dead_code)]
    pub async fn seed_appointment(
        &self,
        shop_id: &str,
        barber_id: &str,
        service_id: &str,
        date: NaiveDate,
        time_start: NaiveTime,
        status: AppointmentStatus,
    ) -> String {
        let mut appointment = Appointment::new(NewAppointmentParams {
            shop_id: shop_id.to_string(),
            barber_id: barber_id.to_string(),
            service_id: service_id.to_string(),
            service_duration_minutes: 30,
            client_name: "Carlos Souza".to_string(),
            client_phone: Some("(11) 91234-5678".to_string()),
            date,
            time_start,
        });
        appointment.status = status.as_str().to_string();

        self.state.appointment_repo.create(&appointment).await.unwrap().id
    }

    #[allow(dead_code)]
    pub async fn appointment_status(&self, shop_id: &str, id: &str) -> Option<String> {
        self.state.appointment_repo.find_by_id(shop_id, id).await.unwrap().map(|a| a.status)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
