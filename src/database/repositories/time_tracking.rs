use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{PenaltyEvent, WorkInterval};

#[derive(Clone)]
pub struct TimeTrackingRepository {
    pool: PgPool,
}

impl TimeTrackingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Intervals started inside the window, resolved or still running.
    pub async fn find_work_intervals(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkInterval>> {
        let intervals = sqlx::query_as::<_, WorkInterval>(
            r#"
            SELECT
                id,
                user_id,
                task_id,
                started_at,
                ended_at,
                duration_seconds
            FROM
                time_entries
            WHERE
                user_id = $1
                AND started_at >= $2
                AND started_at < $3
            ORDER BY
                started_at
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(intervals)
    }

    /// Deduction events whose window opens inside the range.
    pub async fn find_penalty_events(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PenaltyEvent>> {
        let events = sqlx::query_as::<_, PenaltyEvent>(
            r#"
            SELECT
                id,
                user_id,
                minutes,
                reason,
                window_start,
                window_end
            FROM
                penalty_events
            WHERE
                user_id = $1
                AND window_start >= $2
                AND window_start < $3
            ORDER BY
                window_start
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
