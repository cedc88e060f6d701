use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LeaveRecord, LeaveType};

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Approved leaves of the given types whose range touches the window.
    pub async fn find_approved_leaves(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        types: &[LeaveType],
    ) -> Result<Vec<LeaveRecord>> {
        let type_names: Vec<String> = types.iter().map(|t| t.to_string()).collect();

        let leaves = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT
                id,
                user_id,
                leave_type,
                status,
                start_date,
                end_date
            FROM
                leave_requests
            WHERE
                user_id = $1
                AND status = 'approved'
                AND start_date <= $3
                AND end_date >= $2
                AND leave_type = ANY($4)
            ORDER BY
                start_date
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .bind(&type_names)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }
}
