use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(shop_id: String, name: String, price_cents: i64, duration_minutes: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            shop_id,
            name,
            price_cents,
            duration_minutes,
            created_at: Utc::now(),
        }
    }
}
