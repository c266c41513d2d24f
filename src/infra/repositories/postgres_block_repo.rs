use crate::domain::{
    models::block::{BlockDetail, BlockedInterval},
    ports::BlockRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresBlockRepo {
    pool: PgPool,
}

impl PostgresBlockRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockRepository for PostgresBlockRepo {
    async fn list_by_shop(&self, shop_id: &str) -> Result<Vec<BlockDetail>, AppError> {
        sqlx::query_as::<_, BlockDetail>(
            r#"SELECT bi.*, b.name AS barber_name
               FROM blocked_intervals bi
               LEFT JOIN barbers b ON b.id = bi.barber_id
               WHERE bi.shop_id = $1
               ORDER BY bi.date_start, bi.time_start"#
        )
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_between(&self, shop_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<BlockedInterval>, AppError> {
        sqlx::query_as::<_, BlockedInterval>(
            "SELECT * FROM blocked_intervals WHERE shop_id = $1 AND date_start <= $2 AND date_end >= $3 ORDER BY date_start, time_start"
        )
            .bind(shop_id)
            .bind(to)
            .bind(from)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn replace_batch(&self, shop_id: &str, deleted_ids: &[String], blocks: &[BlockedInterval]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for id in deleted_ids {
            sqlx::query("DELETE FROM blocked_intervals WHERE shop_id = $1 AND id = $2")
                .bind(shop_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        let mut inserted = 0;
        for block in blocks {
            inserted += sqlx::query(
                r#"INSERT INTO blocked_intervals (
                    id, shop_id, barber_id, date_start, time_start, date_end, time_end, reason, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#
            )
                .bind(&block.id)
                .bind(shop_id)
                .bind(&block.barber_id)
                .bind(block.date_start)
                .bind(block.time_start)
                .bind(block.date_end)
                .bind(block.time_end)
                .bind(&block.reason)
                .bind(block.created_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?
                .rows_affected();
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }
}
