pub mod config;
pub mod database;
pub mod error;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use uuid::Uuid;

use database::models::{EarningsBreakdown, Invoice, PayPeriod, WalletTransaction};
use services::{
    AttendanceRollupReport, EarningsService, InvoiceGeneration, MonthlyCloseReport,
    PayrollScheduler, PayrollService, SchedulerHandle, SettlementReport, SettlementService,
};

pub use config::Config;
pub use database::PgPayrollStore;
pub use error::AppError;
pub use services::{EarningsEvent, PayrollStore};

/// The assembled engine: cached earnings calculation, period/invoice
/// lifecycle, wallet settlement and the periodic triggers, all over one
/// data-access implementation. The host application constructs one of these
/// at startup and calls through it.
pub struct PayrollEngine {
    pub earnings: Arc<EarningsService>,
    pub payroll: Arc<PayrollService>,
    pub settlement: Arc<SettlementService>,
    pub scheduler: Arc<PayrollScheduler>,
}

impl PayrollEngine {
    /// Must be called from within a tokio runtime (the cache sweep task
    /// starts immediately).
    pub fn new(store: Arc<dyn PayrollStore>, config: &Config) -> Self {
        let earnings = Arc::new(EarningsService::new(
            Arc::clone(&store),
            config.cache_capacity,
            Duration::from_secs(config.cache_sweep_seconds),
        ));
        let payroll = Arc::new(PayrollService::new(
            Arc::clone(&store),
            Arc::clone(&earnings),
        ));
        let settlement = Arc::new(SettlementService::new(Arc::clone(&store)));
        let scheduler = Arc::new(PayrollScheduler::new(store, Arc::clone(&payroll)));
        Self {
            earnings,
            payroll,
            settlement,
            scheduler,
        }
    }

    pub async fn calculate_earnings(
        &self,
        user_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<EarningsBreakdown, AppError> {
        self.earnings
            .calculate(user_id, period_start, period_end)
            .await
    }

    pub fn invalidate_earnings_cache(&self, user_id: Option<Uuid>) {
        self.earnings.invalidate(user_id);
    }

    /// Entry point for mutating operations elsewhere in the platform to
    /// report changes that affect earnings.
    pub fn publish(&self, event: &EarningsEvent) {
        self.earnings.publish(event);
    }

    pub async fn ensure_pay_period(
        &self,
        company_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<PayPeriod, AppError> {
        self.payroll.ensure_period(company_id, year, month).await
    }

    pub async fn generate_invoices(
        &self,
        pay_period_id: Uuid,
    ) -> Result<InvoiceGeneration, AppError> {
        self.payroll.generate_invoices(pay_period_id).await
    }

    pub async fn lock_pay_period(&self, pay_period_id: Uuid) -> Result<PayPeriod, AppError> {
        self.payroll.lock_period(pay_period_id).await
    }

    pub async fn approve_invoice(&self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        self.payroll.approve_invoice(invoice_id).await
    }

    pub async fn pay_invoice(&self, invoice_id: Uuid) -> Result<WalletTransaction, AppError> {
        self.settlement.pay_invoice(invoice_id).await
    }

    pub async fn pay_all_invoices(
        &self,
        pay_period_id: Uuid,
    ) -> Result<SettlementReport, AppError> {
        self.settlement.pay_all_invoices(pay_period_id).await
    }

    pub async fn run_monthly_payroll(&self) -> Result<Option<MonthlyCloseReport>, AppError> {
        self.scheduler.run_monthly_payroll().await
    }

    pub async fn run_daily_attendance(
        &self,
    ) -> Result<Option<AttendanceRollupReport>, AppError> {
        self.scheduler.run_daily_attendance().await
    }

    pub fn start_scheduler(&self, config: &Config) -> SchedulerHandle {
        self.scheduler.start(
            Duration::from_secs(config.payroll_close_interval_seconds),
            Duration::from_secs(config.attendance_rollup_interval_seconds),
        )
    }

    /// Stop background work owned by the engine (the cache sweeper).
    pub fn shutdown(&self) {
        self.earnings.shutdown();
    }
}
