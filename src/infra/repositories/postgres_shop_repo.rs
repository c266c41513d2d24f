use crate::domain::{models::{shop::{Shop, BusinessHours}, user::AdminUser}, ports::ShopRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::PgPool;

pub struct PostgresShopRepo {
    pool: PgPool,
}

impl PostgresShopRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopRepository for PostgresShopRepo {
    async fn create_with_admin(&self, shop: &Shop, admin: &AdminUser) -> Result<(Shop, AdminUser), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created_shop = sqlx::query_as::<_, Shop>(
            r#"INSERT INTO shops (
                id, name, opening_time, closing_time, weekday_start, weekday_end,
                slot_interval_minutes, location, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#
        )
            .bind(&shop.id)
            .bind(&shop.name)
            .bind(shop.opening_time)
            .bind(shop.closing_time)
            .bind(shop.weekday_start)
            .bind(shop.weekday_end)
            .bind(shop.slot_interval_minutes)
            .bind(&shop.location)
            .bind(shop.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let created_admin = sqlx::query_as::<_, AdminUser>(
            "INSERT INTO admin_users (id, shop_id, name, email, password_hash, active, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"
        )
            .bind(&admin.id)
            .bind(&created_shop.id)
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.active)
            .bind(admin.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created_shop, created_admin))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Shop>, AppError> {
        sqlx::query_as::<_, Shop>("SELECT * FROM shops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_ids(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM shops ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_hours(&self, shop_id: &str, hours: &BusinessHours) -> Result<Shop, AppError> {
        sqlx::query_as::<_, Shop>(
            r#"UPDATE shops SET
                opening_time = $1, closing_time = $2, weekday_start = $3, weekday_end = $4,
                slot_interval_minutes = $5, location = $6
               WHERE id = $7 RETURNING *"#
        )
            .bind(hours.opening_time)
            .bind(hours.closing_time)
            .bind(hours.weekday_start)
            .bind(hours.weekday_end)
            .bind(hours.slot_interval_minutes)
            .bind(&hours.location)
            .bind(shop_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Shop not found".into()))
    }

    async fn replace_grid(&self, shop_id: &str, interval_minutes: i64, slots: &[NaiveTime]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM time_slots WHERE shop_id = $1")
            .bind(shop_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut count = 0;
        for slot in slots {
            count += sqlx::query("INSERT INTO time_slots (shop_id, slot_time) VALUES ($1, $2)")
                .bind(shop_id)
                .bind(slot)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .rows_affected();
        }

        sqlx::query("UPDATE shops SET slot_interval_minutes = $1 WHERE id = $2")
            .bind(interval_minutes)
            .bind(shop_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(count)
    }

    async fn list_grid(&self, shop_id: &str) -> Result<Vec<NaiveTime>, AppError> {
        sqlx::query_scalar::<_, NaiveTime>("SELECT slot_time FROM time_slots WHERE shop_id = $1 ORDER BY slot_time")
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
