use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{AttendanceRecord, DailyAttendance};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_attendance(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT
                id,
                user_id,
                company_id,
                day,
                worked_seconds,
                overtime_seconds,
                status
            FROM
                attendance_days
            WHERE
                user_id = $1
                AND day >= $2
                AND day <= $3
            ORDER BY
                day
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// One row per (user, day); the daily rollup replaces it in place.
    pub async fn upsert_attendance(&self, row: &DailyAttendance) -> Result<AttendanceRecord> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO
                attendance_days (
                    id,
                    user_id,
                    company_id,
                    day,
                    worked_seconds,
                    overtime_seconds,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (user_id, day) DO UPDATE SET
                worked_seconds = EXCLUDED.worked_seconds,
                overtime_seconds = EXCLUDED.overtime_seconds,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            RETURNING
                id,
                user_id,
                company_id,
                day,
                worked_seconds,
                overtime_seconds,
                status
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.user_id)
        .bind(row.company_id)
        .bind(row.day)
        .bind(row.worked_seconds)
        .bind(row.overtime_seconds)
        .bind(row.status.clone())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
