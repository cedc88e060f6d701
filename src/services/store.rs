//! The data-access boundary consumed by the payroll engine.
//!
//! One object-safe trait covers every query and write the engine performs,
//! so the services stay independent of the concrete persistence layer. The
//! Postgres implementation lives in `database::store`; tests substitute an
//! in-memory fake.

use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    AttendanceRecord, Company, CompanyPayPolicy, DailyAttendance, EarningsBreakdown, Employee,
    Invoice, LeaveRecord, LeaveType, PayPeriod, PayPeriodStatus, PayRateProfile, PenaltyEvent,
    TaskRate, WalletTransaction, WorkInterval,
};

#[async_trait]
pub trait PayrollStore: Send + Sync {
    // --- time-tracking facts (read-only inputs) ---------------------------

    /// Intervals overlapping the window, both resolved and still running.
    async fn find_work_intervals(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkInterval>>;

    /// Approved leaves of the given types whose range touches the window.
    async fn find_approved_leaves(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        types: &[LeaveType],
    ) -> Result<Vec<LeaveRecord>>;

    async fn find_attendance(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;

    async fn find_penalty_events(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PenaltyEvent>>;

    // --- pay configuration ------------------------------------------------

    async fn get_pay_profile(&self, user_id: Uuid) -> Result<Option<PayRateProfile>>;

    async fn get_company_pay_policy(&self, company_id: Uuid)
    -> Result<Option<CompanyPayPolicy>>;

    async fn find_task_rates(&self, task_ids: &[Uuid]) -> Result<Vec<TaskRate>>;

    // --- directory --------------------------------------------------------

    async fn list_active_companies(&self) -> Result<Vec<Company>>;

    async fn list_eligible_employees(&self, company_id: Uuid) -> Result<Vec<Employee>>;

    // --- pay periods & invoices -------------------------------------------

    async fn find_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<Option<PayPeriod>>;

    /// Get-or-create keyed by (company, start); racing creators converge on
    /// the single existing row.
    async fn create_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: &str,
    ) -> Result<PayPeriod>;

    async fn get_pay_period(&self, id: Uuid) -> Result<Option<PayPeriod>>;

    async fn set_pay_period_status(
        &self,
        id: Uuid,
        status: PayPeriodStatus,
    ) -> Result<PayPeriod>;

    async fn set_pay_period_total(&self, id: Uuid, total: &BigDecimal) -> Result<()>;

    /// Insert or replace the one invoice for (period, user), resetting it to
    /// draft with the breakdown's figures.
    async fn upsert_invoice(
        &self,
        pay_period_id: Uuid,
        breakdown: &EarningsBreakdown,
    ) -> Result<Invoice>;

    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>>;

    async fn list_invoices(&self, pay_period_id: Uuid) -> Result<Vec<Invoice>>;

    /// Draft-to-approved transition. Returns None when the invoice was not
    /// in draft (or does not exist); the caller distinguishes the two.
    async fn approve_invoice(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Invoice>>;

    // --- settlement -------------------------------------------------------

    /// The one atomic multi-write of the engine: lazily create the wallet,
    /// credit it with the invoice's net amount, append the ledger entry and
    /// mark the invoice paid. All of it commits or none of it does.
    async fn settle_invoice(
        &self,
        invoice: &Invoice,
        at: DateTime<Utc>,
    ) -> Result<WalletTransaction>;

    // --- attendance rollup ------------------------------------------------

    async fn upsert_attendance(&self, row: &DailyAttendance) -> Result<AttendanceRecord>;
}
