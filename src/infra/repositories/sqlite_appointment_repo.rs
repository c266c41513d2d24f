use crate::domain::{
    models::appointment::{Appointment, AppointmentDetail, AppointmentStatus},
    ports::AppointmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;

const DETAIL_SELECT: &str = r#"SELECT a.*, b.name AS barber_name, s.name AS service_name, s.price_cents AS price_cents
    FROM appointments a
    LEFT JOIN barbers b ON b.id = a.barber_id
    LEFT JOIN services s ON s.id = a.service_id"#;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (
                id, shop_id, barber_id, service_id, client_name, client_phone,
                appointment_date, time_start, time_end, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.shop_id)
            .bind(&appointment.barber_id)
            .bind(&appointment.service_id)
            .bind(&appointment.client_name)
            .bind(&appointment.client_phone)
            .bind(appointment.appointment_date)
            .bind(appointment.time_start)
            .bind(appointment.time_end)
            .bind(&appointment.status)
            .bind(appointment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, shop_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE shop_id = ? AND id = ?")
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_details(&self, shop_id: &str) -> Result<Vec<AppointmentDetail>, AppError> {
        let sql = format!("{} WHERE a.shop_id = ? ORDER BY a.appointment_date, a.time_start", DETAIL_SELECT);
        sqlx::query_as::<_, AppointmentDetail>(&sql)
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_details_by_date(
        &self,
        shop_id: &str,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<AppointmentDetail>, AppError> {
        let sql = format!(
            "{} WHERE a.shop_id = ? AND a.appointment_date = ? ORDER BY a.time_start",
            DETAIL_SELECT
        );
        let rows = sqlx::query_as::<_, AppointmentDetail>(&sql)
            .bind(shop_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(rows.into_iter().filter(|r| statuses.contains(&r.appointment.status())).collect())
    }

    async fn list_between(&self, shop_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE shop_id = ? AND appointment_date >= ? AND appointment_date <= ? ORDER BY appointment_date, time_start"
        )
            .bind(shop_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_status(&self, shop_id: &str, id: &str, status: AppointmentStatus) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE appointments SET status = ? WHERE shop_id = ? AND id = ?")
            .bind(status.as_str())
            .bind(shop_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn complete_scheduled_before(&self, shop_id: &str, cutoff: NaiveDateTime) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"UPDATE appointments SET status = 'completed'
               WHERE shop_id = ? AND status = 'scheduled'
                 AND (appointment_date < ? OR (appointment_date = ? AND time_start < ?))"#
        )
            .bind(shop_id)
            .bind(cutoff.date())
            .bind(cutoff.date())
            .bind(cutoff.time())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn purge_terminal_before(&self, shop_id: &str, date: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM appointments WHERE shop_id = ? AND status IN ('completed', 'cancelled') AND appointment_date < ?"
        )
            .bind(shop_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
