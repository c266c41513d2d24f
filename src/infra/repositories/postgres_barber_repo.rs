use crate::domain::{
    models::barber::{Barber, BarberWithPeriods, WorkingPeriod},
    ports::BarberRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBarberRepo {
    pool: PgPool,
}

impl PostgresBarberRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BarberRepository for PostgresBarberRepo {
    async fn list_active(&self, shop_id: &str) -> Result<Vec<Barber>, AppError> {
        sqlx::query_as::<_, Barber>("SELECT * FROM barbers WHERE shop_id = $1 AND active = TRUE ORDER BY name")
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<Barber>, AppError> {
        sqlx::query_as::<_, Barber>("SELECT * FROM barbers WHERE shop_id = $1 AND id = $2")
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_periods(&self, shop_id: &str) -> Result<Vec<WorkingPeriod>, AppError> {
        sqlx::query_as::<_, WorkingPeriod>(
            "SELECT * FROM working_periods WHERE shop_id = $1 ORDER BY barber_id, weekday, start_time"
        )
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn save_batch(&self, shop_id: &str, barbers: &[BarberWithPeriods], deleted_ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Soft delete keeps appointment history pointing at a real row.
        for id in deleted_ids {
            sqlx::query("UPDATE barbers SET active = FALSE WHERE shop_id = $1 AND id = $2")
                .bind(shop_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            sqlx::query("DELETE FROM working_periods WHERE shop_id = $1 AND barber_id = $2")
                .bind(shop_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            sqlx::query("DELETE FROM blocked_intervals WHERE shop_id = $1 AND barber_id = $2")
                .bind(shop_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        for entry in barbers {
            let barber = &entry.barber;
            sqlx::query(
                r#"INSERT INTO barbers (id, shop_id, name, active, lunch_start, lunch_end, created_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)
                   ON CONFLICT (id) DO UPDATE SET
                       name = excluded.name,
                       active = excluded.active,
                       lunch_start = excluded.lunch_start,
                       lunch_end = excluded.lunch_end
                   WHERE barbers.shop_id = excluded.shop_id"#
            )
                .bind(&barber.id)
                .bind(shop_id)
                .bind(&barber.name)
                .bind(barber.active)
                .bind(barber.lunch_start)
                .bind(barber.lunch_end)
                .bind(barber.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            sqlx::query("DELETE FROM working_periods WHERE shop_id = $1 AND barber_id = $2")
                .bind(shop_id)
                .bind(&barber.id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            for period in &entry.periods {
                sqlx::query(
                    "INSERT INTO working_periods (id, shop_id, barber_id, weekday, start_time, end_time) VALUES ($1, $2, $3, $4, $5, $6)"
                )
                    .bind(&period.id)
                    .bind(shop_id)
                    .bind(&barber.id)
                    .bind(period.weekday)
                    .bind(period.start_time)
                    .bind(period.end_time)
                    .execute(&mut *tx)
                    .await
                    .map_err(AppError::Database)?;
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
