//! Postgres implementation of the engine's data-access boundary, composed
//! from the per-domain repositories.

use anyhow::Result;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    AttendanceRecord, Company, CompanyPayPolicy, DailyAttendance, EarningsBreakdown, Employee,
    Invoice, LeaveRecord, LeaveType, PayPeriod, PayPeriodStatus, PayRateProfile, PenaltyEvent,
    TaskRate, WalletTransaction, WorkInterval,
};
use crate::database::repositories::{
    AttendanceRepository, CompanyRepository, LeaveRepository, PayRepository, PayrollRepository,
    TimeTrackingRepository, WalletRepository,
};
use crate::services::store::PayrollStore;

#[derive(Clone)]
pub struct PgPayrollStore {
    time_tracking: TimeTrackingRepository,
    leave: LeaveRepository,
    attendance: AttendanceRepository,
    pay: PayRepository,
    company: CompanyRepository,
    payroll: PayrollRepository,
    wallet: WalletRepository,
}

impl PgPayrollStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            time_tracking: TimeTrackingRepository::new(pool.clone()),
            leave: LeaveRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            pay: PayRepository::new(pool.clone()),
            company: CompanyRepository::new(pool.clone()),
            payroll: PayrollRepository::new(pool.clone()),
            wallet: WalletRepository::new(pool),
        }
    }
}

#[async_trait]
impl PayrollStore for PgPayrollStore {
    async fn find_work_intervals(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkInterval>> {
        self.time_tracking
            .find_work_intervals(user_id, start, end)
            .await
    }

    async fn find_approved_leaves(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        types: &[LeaveType],
    ) -> Result<Vec<LeaveRecord>> {
        self.leave
            .find_approved_leaves(user_id, start, end, types)
            .await
    }

    async fn find_attendance(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.attendance.find_attendance(user_id, start, end).await
    }

    async fn find_penalty_events(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PenaltyEvent>> {
        self.time_tracking
            .find_penalty_events(user_id, start, end)
            .await
    }

    async fn get_pay_profile(&self, user_id: Uuid) -> Result<Option<PayRateProfile>> {
        self.pay.get_pay_profile(user_id).await
    }

    async fn get_company_pay_policy(
        &self,
        company_id: Uuid,
    ) -> Result<Option<CompanyPayPolicy>> {
        self.pay.get_company_pay_policy(company_id).await
    }

    async fn find_task_rates(&self, task_ids: &[Uuid]) -> Result<Vec<TaskRate>> {
        self.pay.find_task_rates(task_ids).await
    }

    async fn list_active_companies(&self) -> Result<Vec<Company>> {
        self.company.list_active_companies().await
    }

    async fn list_eligible_employees(&self, company_id: Uuid) -> Result<Vec<Employee>> {
        self.company.list_eligible_employees(company_id).await
    }

    async fn find_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<Option<PayPeriod>> {
        self.payroll.find_pay_period(company_id, period_start).await
    }

    async fn create_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: &str,
    ) -> Result<PayPeriod> {
        self.payroll
            .create_pay_period(company_id, period_start, period_end, currency)
            .await
    }

    async fn get_pay_period(&self, id: Uuid) -> Result<Option<PayPeriod>> {
        self.payroll.get_pay_period(id).await
    }

    async fn set_pay_period_status(
        &self,
        id: Uuid,
        status: PayPeriodStatus,
    ) -> Result<PayPeriod> {
        self.payroll.set_pay_period_status(id, status).await
    }

    async fn set_pay_period_total(&self, id: Uuid, total: &BigDecimal) -> Result<()> {
        self.payroll.set_pay_period_total(id, total).await
    }

    async fn upsert_invoice(
        &self,
        pay_period_id: Uuid,
        breakdown: &EarningsBreakdown,
    ) -> Result<Invoice> {
        self.payroll.upsert_invoice(pay_period_id, breakdown).await
    }

    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
        self.payroll.get_invoice(id).await
    }

    async fn list_invoices(&self, pay_period_id: Uuid) -> Result<Vec<Invoice>> {
        self.payroll.list_invoices(pay_period_id).await
    }

    async fn approve_invoice(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Invoice>> {
        self.payroll.approve_invoice(id, at).await
    }

    async fn settle_invoice(
        &self,
        invoice: &Invoice,
        at: DateTime<Utc>,
    ) -> Result<WalletTransaction> {
        self.wallet.settle_invoice(invoice, at).await
    }

    async fn upsert_attendance(&self, row: &DailyAttendance) -> Result<AttendanceRecord> {
        self.attendance.upsert_attendance(row).await
    }
}
