use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CompanyPayPolicy, PayRateProfile, TaskRate};

#[derive(Clone)]
pub struct PayRepository {
    pool: PgPool,
}

impl PayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_pay_profile(&self, user_id: Uuid) -> Result<Option<PayRateProfile>> {
        let profile = sqlx::query_as::<_, PayRateProfile>(
            r#"
            SELECT
                user_id,
                company_id,
                salary_type,
                hourly_rate,
                monthly_salary,
                expected_hours_per_day,
                currency
            FROM
                pay_profiles
            WHERE
                user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn get_company_pay_policy(
        &self,
        company_id: Uuid,
    ) -> Result<Option<CompanyPayPolicy>> {
        let policy = sqlx::query_as::<_, CompanyPayPolicy>(
            r#"
            SELECT
                company_id,
                overtime_multiplier,
                working_days_per_month,
                default_expected_hours
            FROM
                company_pay_policies
            WHERE
                company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(policy)
    }

    /// Billing rates for the market-value comparison: each task's own hourly
    /// rate, its highest-rate sub-task and the total of fixed-price
    /// sub-tasks.
    pub async fn find_task_rates(&self, task_ids: &[Uuid]) -> Result<Vec<TaskRate>> {
        let rates = sqlx::query_as::<_, TaskRate>(
            r#"
            SELECT
                t.id AS task_id,
                t.hourly_rate,
                MAX(s.hourly_rate) AS top_subtask_rate,
                SUM(s.fixed_price) AS fixed_price_total
            FROM
                tasks t
                LEFT JOIN tasks s ON s.parent_task_id = t.id
            WHERE
                t.id = ANY($1)
            GROUP BY
                t.id,
                t.hourly_rate
            "#,
        )
        .bind(task_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }
}
