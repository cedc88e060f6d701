use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    EarningsBreakdown, Invoice, PayPeriod, PayPeriodStatus,
};

const PAY_PERIOD_COLUMNS: &str = r#"
    id,
    company_id,
    period_start,
    period_end,
    status,
    total_amount,
    currency,
    created_at,
    updated_at
"#;

const INVOICE_COLUMNS: &str = r#"
    id,
    pay_period_id,
    user_id,
    worked_hours,
    worked_days,
    paid_leave_days,
    leave_hours,
    overtime_hours,
    penalty_hours,
    worked_amount,
    leave_pay,
    overtime_pay,
    penalty_amount,
    gross_amount,
    net_amount,
    currency,
    status,
    approved_at,
    paid_at,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<Option<PayPeriod>> {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            r#"
            SELECT {PAY_PERIOD_COLUMNS}
            FROM pay_periods
            WHERE company_id = $1 AND period_start = $2
            "#
        ))
        .bind(company_id)
        .bind(period_start)
        .fetch_optional(&self.pool)
        .await?;

        Ok(period)
    }

    /// Get-or-create on the (company, start) identity. A concurrent creator
    /// loses the conflict and receives the already-existing row.
    pub async fn create_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: &str,
    ) -> Result<PayPeriod> {
        let now = Utc::now();

        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            r#"
            INSERT INTO
                pay_periods (
                    id,
                    company_id,
                    period_start,
                    period_end,
                    status,
                    total_amount,
                    currency,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, 0, $6, $7, $7)
            ON CONFLICT (company_id, period_start) DO UPDATE SET
                updated_at = pay_periods.updated_at
            RETURNING {PAY_PERIOD_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(period_start)
        .bind(period_end)
        .bind(PayPeriodStatus::Open)
        .bind(currency)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(period)
    }

    pub async fn get_pay_period(&self, id: Uuid) -> Result<Option<PayPeriod>> {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            r#"
            SELECT {PAY_PERIOD_COLUMNS}
            FROM pay_periods
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(period)
    }

    pub async fn set_pay_period_status(
        &self,
        id: Uuid,
        status: PayPeriodStatus,
    ) -> Result<PayPeriod> {
        let now = Utc::now();

        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            r#"
            UPDATE pay_periods
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {PAY_PERIOD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(period)
    }

    pub async fn set_pay_period_total(&self, id: Uuid, total: &BigDecimal) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE pay_periods
            SET total_amount = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(total)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace the single invoice for (period, user). Regeneration
    /// resets the row to draft and clears the approval/payment marks.
    pub async fn upsert_invoice(
        &self,
        pay_period_id: Uuid,
        breakdown: &EarningsBreakdown,
    ) -> Result<Invoice> {
        let now = Utc::now();

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO
                invoices (
                    id,
                    pay_period_id,
                    user_id,
                    worked_hours,
                    worked_days,
                    paid_leave_days,
                    leave_hours,
                    overtime_hours,
                    penalty_hours,
                    worked_amount,
                    leave_pay,
                    overtime_pay,
                    penalty_amount,
                    gross_amount,
                    net_amount,
                    currency,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, 'draft', $17, $17)
            ON CONFLICT (pay_period_id, user_id) DO UPDATE SET
                worked_hours = EXCLUDED.worked_hours,
                worked_days = EXCLUDED.worked_days,
                paid_leave_days = EXCLUDED.paid_leave_days,
                leave_hours = EXCLUDED.leave_hours,
                overtime_hours = EXCLUDED.overtime_hours,
                penalty_hours = EXCLUDED.penalty_hours,
                worked_amount = EXCLUDED.worked_amount,
                leave_pay = EXCLUDED.leave_pay,
                overtime_pay = EXCLUDED.overtime_pay,
                penalty_amount = EXCLUDED.penalty_amount,
                gross_amount = EXCLUDED.gross_amount,
                net_amount = EXCLUDED.net_amount,
                currency = EXCLUDED.currency,
                status = 'draft',
                approved_at = NULL,
                paid_at = NULL,
                updated_at = EXCLUDED.updated_at
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(pay_period_id)
        .bind(breakdown.user_id)
        .bind(&breakdown.worked_hours)
        .bind(breakdown.worked_days)
        .bind(&breakdown.paid_leave_days)
        .bind(&breakdown.leave_hours)
        .bind(&breakdown.overtime_hours)
        .bind(&breakdown.penalty_hours)
        .bind(&breakdown.worked_amount)
        .bind(&breakdown.leave_pay)
        .bind(&breakdown.overtime_pay)
        .bind(&breakdown.penalty_amount)
        .bind(&breakdown.gross_amount)
        .bind(&breakdown.net_amount)
        .bind(&breakdown.currency)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn list_invoices(&self, pay_period_id: Uuid) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE pay_period_id = $1
            ORDER BY created_at
            "#
        ))
        .bind(pay_period_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Draft-to-approved, guarded in SQL so concurrent approvals cannot
    /// double-apply. None when the row was not a draft (or is missing).
    pub async fn approve_invoice(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'approved', approved_at = $2, updated_at = $2
            WHERE id = $1 AND status = 'draft'
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }
}
