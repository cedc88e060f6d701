//! Coarse periodic triggers: the monthly payroll close and the daily
//! attendance rollup. Each pass is guarded by an atomic compare-and-set so
//! overlapping triggers are dropped, never queued, and per-company errors
//! are logged without blocking the remaining companies.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{
    AttendanceStatus, Company, DEFAULT_EXPECTED_HOURS_PER_DAY, DailyAttendance, Employee,
    LeaveType, PayPeriodStatus,
};
use crate::error::AppError;

use super::payroll::PayrollService;
use super::period_math::{
    day_end_utc, day_start_utc, is_business_day, previous_month, sum_worked_seconds,
};
use super::store::PayrollStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCloseReport {
    pub companies: usize,
    pub invoices_generated: usize,
    pub failures: Vec<(Uuid, String)>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRollupReport {
    pub day: NaiveDate,
    pub companies: usize,
    pub rows_written: usize,
    pub failures: Vec<(Uuid, String)>,
}

/// Compare-and-set re-entrancy flag, released on drop.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
            .then(|| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct PayrollScheduler {
    store: Arc<dyn PayrollStore>,
    payroll: Arc<PayrollService>,
    closing: AtomicBool,
    rolling_up: AtomicBool,
}

/// Handles to the two spawned ticker tasks; aborting them stops scheduling.
pub struct SchedulerHandle {
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn stop(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl PayrollScheduler {
    pub fn new(store: Arc<dyn PayrollStore>, payroll: Arc<PayrollService>) -> Self {
        Self {
            store,
            payroll,
            closing: AtomicBool::new(false),
            rolling_up: AtomicBool::new(false),
        }
    }

    /// Close the previous month for every active company and open the
    /// current one. Returns None when another close is already in flight.
    pub async fn run_monthly_payroll(&self) -> Result<Option<MonthlyCloseReport>, AppError> {
        let Some(_guard) = RunGuard::acquire(&self.closing) else {
            log::debug!("monthly payroll close already in flight, dropping trigger");
            return Ok(None);
        };

        let today = Utc::now().date_naive();
        let (prev_year, prev_month) = previous_month(today);
        let companies = self.store.list_active_companies().await?;

        let mut report = MonthlyCloseReport {
            companies: companies.len(),
            invoices_generated: 0,
            failures: Vec::new(),
        };
        for company in &companies {
            match self
                .close_company_month(company, prev_year, prev_month, today)
                .await
            {
                Ok(generated) => report.invoices_generated += generated,
                Err(err) => {
                    log::error!(
                        "monthly close failed for company {} ({}): {err}",
                        company.name,
                        company.id
                    );
                    report.failures.push((company.id, err.to_string()));
                }
            }
        }
        log::info!(
            "monthly payroll close: {} companies, {} invoices, {} failures",
            report.companies,
            report.invoices_generated,
            report.failures.len()
        );
        Ok(Some(report))
    }

    async fn close_company_month(
        &self,
        company: &Company,
        prev_year: i32,
        prev_month: u32,
        today: NaiveDate,
    ) -> Result<usize, AppError> {
        let previous = self
            .payroll
            .ensure_period(company.id, prev_year, prev_month)
            .await?;
        // A locked or paid previous month is a no-op, not an error.
        let generated = if previous.status == PayPeriodStatus::Open {
            self.payroll
                .generate_invoices(previous.id)
                .await?
                .invoices
                .len()
        } else {
            0
        };
        self.payroll
            .ensure_period(company.id, today.year(), today.month())
            .await?;
        Ok(generated)
    }

    /// Materialize yesterday's attendance rows, company by company. Returns
    /// None when another rollup is already in flight.
    pub async fn run_daily_attendance(
        &self,
    ) -> Result<Option<AttendanceRollupReport>, AppError> {
        let Some(_guard) = RunGuard::acquire(&self.rolling_up) else {
            log::debug!("attendance rollup already in flight, dropping trigger");
            return Ok(None);
        };

        let today = Utc::now().date_naive();
        let Some(day) = today.pred_opt() else {
            return Ok(None);
        };
        let companies = self.store.list_active_companies().await?;

        let mut report = AttendanceRollupReport {
            day,
            companies: companies.len(),
            rows_written: 0,
            failures: Vec::new(),
        };
        for company in &companies {
            match self.rollup_company_day(company, day).await {
                Ok(rows) => report.rows_written += rows,
                Err(err) => {
                    log::error!(
                        "attendance rollup failed for company {} ({}): {err}",
                        company.name,
                        company.id
                    );
                    report.failures.push((company.id, err.to_string()));
                }
            }
        }
        log::info!(
            "attendance rollup for {}: {} rows across {} companies, {} failures",
            day,
            report.rows_written,
            report.companies,
            report.failures.len()
        );
        Ok(Some(report))
    }

    async fn rollup_company_day(
        &self,
        company: &Company,
        day: NaiveDate,
    ) -> Result<usize, AppError> {
        let employees = self.store.list_eligible_employees(company.id).await?;
        let mut written = 0;
        for employee in &employees {
            let row = self.build_attendance(employee, day).await?;
            self.store.upsert_attendance(&row).await?;
            written += 1;
        }
        Ok(written)
    }

    async fn build_attendance(
        &self,
        employee: &Employee,
        day: NaiveDate,
    ) -> Result<DailyAttendance, AppError> {
        let intervals = self
            .store
            .find_work_intervals(employee.id, day_start_utc(day), day_end_utc(day))
            .await?;
        let (worked_seconds, _) = sum_worked_seconds(&intervals, Utc::now());

        let expected_seconds = if is_business_day(day) {
            self.expected_seconds(employee.id).await?
        } else {
            0
        };
        let overtime_seconds = (worked_seconds - expected_seconds).max(0);

        let on_leave = !self
            .store
            .find_approved_leaves(
                employee.id,
                day,
                day,
                &[
                    LeaveType::Paid,
                    LeaveType::Sick,
                    LeaveType::HalfDay,
                    LeaveType::Unpaid,
                ],
            )
            .await?
            .is_empty();

        let status = if !is_business_day(day) {
            AttendanceStatus::Holiday
        } else if on_leave {
            AttendanceStatus::OnLeave
        } else if worked_seconds == 0 {
            AttendanceStatus::Absent
        } else if worked_seconds >= expected_seconds {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Partial
        };

        Ok(DailyAttendance {
            user_id: employee.id,
            company_id: employee.company_id,
            day,
            worked_seconds,
            overtime_seconds,
            status,
        })
    }

    async fn expected_seconds(&self, user_id: Uuid) -> Result<i64, AppError> {
        let profile = self.store.get_pay_profile(user_id).await?;
        let policy = match &profile {
            Some(p) => self.store.get_company_pay_policy(p.company_id).await?,
            None => None,
        };
        let expected_hours = profile
            .and_then(|p| p.expected_hours_per_day)
            .or_else(|| policy.map(|p| p.default_expected_hours))
            .filter(|hours| !bigdecimal::Zero::is_zero(hours))
            .unwrap_or_else(|| BigDecimal::from(DEFAULT_EXPECTED_HOURS_PER_DAY));
        let seconds = (&expected_hours * &BigDecimal::from(3600))
            .to_i64()
            .unwrap_or((DEFAULT_EXPECTED_HOURS_PER_DAY as i64) * 3600);
        Ok(seconds)
    }

    /// Spawn the periodic triggers. The first tick of each fires
    /// immediately, which doubles as a catch-up after downtime.
    pub fn start(
        self: &Arc<Self>,
        close_every: Duration,
        rollup_every: Duration,
    ) -> SchedulerHandle {
        let close_task = {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(close_every);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if let Err(err) = scheduler.run_monthly_payroll().await {
                        log::error!("monthly payroll close failed: {err}");
                    }
                }
            })
        };
        let rollup_task = {
            let scheduler = Arc::clone(self);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(rollup_every);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if let Err(err) = scheduler.run_daily_attendance().await {
                        log::error!("attendance rollup failed: {err}");
                    }
                }
            })
        };
        SchedulerHandle {
            tasks: vec![close_task, rollup_task],
        }
    }
}
