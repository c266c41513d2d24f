use crate::domain::{models::user::{AdminUser, ProfilePatch}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<AdminUser>, AppError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE shop_id = ? AND id = ?")
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_profile(&self, shop_id: &str, id: &str, patch: &ProfilePatch) -> Result<AdminUser, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists = sqlx::query_scalar::<_, String>("SELECT id FROM admin_users WHERE shop_id = ? AND id = ?")
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if exists.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }

        if let Some(name) = &patch.name {
            sqlx::query("UPDATE admin_users SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        if let Some(email) = &patch.email {
            sqlx::query("UPDATE admin_users SET email = ? WHERE id = ?")
                .bind(email)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        if let Some(hash) = &patch.password_hash {
            sqlx::query("UPDATE admin_users SET password_hash = ? WHERE id = ?")
                .bind(hash)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        let user = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(user)
    }
}
