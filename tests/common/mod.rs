//! Shared test fixtures: an in-memory `PayrollStore` with read-call
//! counters and failure injection, plus builders for the domain rows.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use workpulse_be::database::models::{
    AttendanceRecord, AttendanceStatus, Company, CompanyPayPolicy, DailyAttendance,
    EarningsBreakdown, Employee, Invoice, InvoiceStatus, LeaveRecord, LeaveStatus, LeaveType,
    PayPeriod, PayPeriodStatus, PayRateProfile, PenaltyEvent, SalaryType, TaskRate, Wallet,
    WalletTransaction, WalletTransactionType, WorkInterval,
};
use workpulse_be::{Config, PayrollEngine, PayrollStore};

#[derive(Default)]
pub struct FakeStore {
    pub intervals: Mutex<Vec<WorkInterval>>,
    pub leaves: Mutex<Vec<LeaveRecord>>,
    pub attendance: Mutex<Vec<AttendanceRecord>>,
    pub penalties: Mutex<Vec<PenaltyEvent>>,
    pub profiles: Mutex<HashMap<Uuid, PayRateProfile>>,
    pub policies: Mutex<HashMap<Uuid, CompanyPayPolicy>>,
    pub task_rates: Mutex<Vec<TaskRate>>,
    pub companies: Mutex<Vec<Company>>,
    pub employees: Mutex<Vec<Employee>>,
    pub periods: Mutex<Vec<PayPeriod>>,
    pub invoices: Mutex<Vec<Invoice>>,
    pub wallets: Mutex<HashMap<Uuid, Wallet>>,
    pub wallet_transactions: Mutex<Vec<WalletTransaction>>,
    pub attendance_upserts: Mutex<Vec<DailyAttendance>>,

    /// Counts every fact read the earnings calculator performs.
    pub read_calls: AtomicU64,
    /// Invoice ids whose settlement must fail without side effects.
    pub fail_settlement_for: Mutex<HashSet<Uuid>>,
    /// Company ids whose employee listing fails.
    pub fail_employees_for: Mutex<HashSet<Uuid>>,
    /// Delay `list_active_companies` to widen scheduler race windows.
    pub slow_companies: bool,
}

impl FakeStore {
    fn count_read(&self) {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reads(&self) -> u64 {
        self.read_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PayrollStore for FakeStore {
    async fn find_work_intervals(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WorkInterval>> {
        self.count_read();
        Ok(self
            .intervals
            .lock()
            .unwrap()
            .iter()
            .filter(|iv| iv.user_id == user_id && iv.started_at >= start && iv.started_at < end)
            .cloned()
            .collect())
    }

    async fn find_approved_leaves(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        types: &[LeaveType],
    ) -> Result<Vec<LeaveRecord>> {
        self.count_read();
        Ok(self
            .leaves
            .lock()
            .unwrap()
            .iter()
            .filter(|leave| {
                leave.user_id == user_id
                    && leave.status == LeaveStatus::Approved
                    && leave.start_date <= end
                    && leave.end_date >= start
                    && types.contains(&leave.leave_type)
            })
            .cloned()
            .collect())
    }

    async fn find_attendance(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.count_read();
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user_id && row.day >= start && row.day <= end)
            .cloned()
            .collect())
    }

    async fn find_penalty_events(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PenaltyEvent>> {
        self.count_read();
        Ok(self
            .penalties
            .lock()
            .unwrap()
            .iter()
            .filter(|event| {
                event.user_id == user_id
                    && event.window_start >= start
                    && event.window_start < end
            })
            .cloned()
            .collect())
    }

    async fn get_pay_profile(&self, user_id: Uuid) -> Result<Option<PayRateProfile>> {
        self.count_read();
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn get_company_pay_policy(
        &self,
        company_id: Uuid,
    ) -> Result<Option<CompanyPayPolicy>> {
        self.count_read();
        Ok(self.policies.lock().unwrap().get(&company_id).cloned())
    }

    async fn find_task_rates(&self, task_ids: &[Uuid]) -> Result<Vec<TaskRate>> {
        self.count_read();
        Ok(self
            .task_rates
            .lock()
            .unwrap()
            .iter()
            .filter(|rate| task_ids.contains(&rate.task_id))
            .cloned()
            .collect())
    }

    async fn list_active_companies(&self) -> Result<Vec<Company>> {
        if self.slow_companies {
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|company| company.is_active)
            .cloned()
            .collect())
    }

    async fn list_eligible_employees(&self, company_id: Uuid) -> Result<Vec<Employee>> {
        if self.fail_employees_for.lock().unwrap().contains(&company_id) {
            bail!("employee directory unavailable for company {company_id}");
        }
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .filter(|employee| employee.company_id == company_id && employee.is_active)
            .cloned()
            .collect())
    }

    async fn find_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<Option<PayPeriod>> {
        Ok(self
            .periods
            .lock()
            .unwrap()
            .iter()
            .find(|period| {
                period.company_id == company_id && period.period_start == period_start
            })
            .cloned())
    }

    async fn create_pay_period(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: &str,
    ) -> Result<PayPeriod> {
        let mut periods = self.periods.lock().unwrap();
        if let Some(existing) = periods
            .iter()
            .find(|p| p.company_id == company_id && p.period_start == period_start)
        {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let period = PayPeriod {
            id: Uuid::new_v4(),
            company_id,
            period_start,
            period_end,
            status: PayPeriodStatus::Open,
            total_amount: BigDecimal::zero(),
            currency: currency.to_string(),
            created_at: now,
            updated_at: now,
        };
        periods.push(period.clone());
        Ok(period)
    }

    async fn get_pay_period(&self, id: Uuid) -> Result<Option<PayPeriod>> {
        Ok(self
            .periods
            .lock()
            .unwrap()
            .iter()
            .find(|period| period.id == id)
            .cloned())
    }

    async fn set_pay_period_status(
        &self,
        id: Uuid,
        status: PayPeriodStatus,
    ) -> Result<PayPeriod> {
        let mut periods = self.periods.lock().unwrap();
        let period = periods
            .iter_mut()
            .find(|period| period.id == id)
            .ok_or_else(|| anyhow::anyhow!("pay period {id} not found"))?;
        period.status = status;
        period.updated_at = Utc::now();
        Ok(period.clone())
    }

    async fn set_pay_period_total(&self, id: Uuid, total: &BigDecimal) -> Result<()> {
        let mut periods = self.periods.lock().unwrap();
        let period = periods
            .iter_mut()
            .find(|period| period.id == id)
            .ok_or_else(|| anyhow::anyhow!("pay period {id} not found"))?;
        period.total_amount = total.clone();
        period.updated_at = Utc::now();
        Ok(())
    }

    async fn upsert_invoice(
        &self,
        pay_period_id: Uuid,
        breakdown: &EarningsBreakdown,
    ) -> Result<Invoice> {
        let now = Utc::now();
        let mut invoices = self.invoices.lock().unwrap();
        if let Some(existing) = invoices
            .iter_mut()
            .find(|inv| inv.pay_period_id == pay_period_id && inv.user_id == breakdown.user_id)
        {
            existing.worked_hours = breakdown.worked_hours.clone();
            existing.worked_days = breakdown.worked_days;
            existing.paid_leave_days = breakdown.paid_leave_days.clone();
            existing.leave_hours = breakdown.leave_hours.clone();
            existing.overtime_hours = breakdown.overtime_hours.clone();
            existing.penalty_hours = breakdown.penalty_hours.clone();
            existing.worked_amount = breakdown.worked_amount.clone();
            existing.leave_pay = breakdown.leave_pay.clone();
            existing.overtime_pay = breakdown.overtime_pay.clone();
            existing.penalty_amount = breakdown.penalty_amount.clone();
            existing.gross_amount = breakdown.gross_amount.clone();
            existing.net_amount = breakdown.net_amount.clone();
            existing.currency = breakdown.currency.clone();
            existing.status = InvoiceStatus::Draft;
            existing.approved_at = None;
            existing.paid_at = None;
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let invoice = Invoice {
            id: Uuid::new_v4(),
            pay_period_id,
            user_id: breakdown.user_id,
            worked_hours: breakdown.worked_hours.clone(),
            worked_days: breakdown.worked_days,
            paid_leave_days: breakdown.paid_leave_days.clone(),
            leave_hours: breakdown.leave_hours.clone(),
            overtime_hours: breakdown.overtime_hours.clone(),
            penalty_hours: breakdown.penalty_hours.clone(),
            worked_amount: breakdown.worked_amount.clone(),
            leave_pay: breakdown.leave_pay.clone(),
            overtime_pay: breakdown.overtime_pay.clone(),
            penalty_amount: breakdown.penalty_amount.clone(),
            gross_amount: breakdown.gross_amount.clone(),
            net_amount: breakdown.net_amount.clone(),
            currency: breakdown.currency.clone(),
            status: InvoiceStatus::Draft,
            approved_at: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>> {
        Ok(self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .find(|invoice| invoice.id == id)
            .cloned())
    }

    async fn list_invoices(&self, pay_period_id: Uuid) -> Result<Vec<Invoice>> {
        Ok(self
            .invoices
            .lock()
            .unwrap()
            .iter()
            .filter(|invoice| invoice.pay_period_id == pay_period_id)
            .cloned()
            .collect())
    }

    async fn approve_invoice(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Invoice>> {
        let mut invoices = self.invoices.lock().unwrap();
        let Some(invoice) = invoices.iter_mut().find(|invoice| invoice.id == id) else {
            return Ok(None);
        };
        if invoice.status != InvoiceStatus::Draft {
            return Ok(None);
        }
        invoice.status = InvoiceStatus::Approved;
        invoice.approved_at = Some(at);
        invoice.updated_at = at;
        Ok(Some(invoice.clone()))
    }

    async fn settle_invoice(
        &self,
        invoice: &Invoice,
        at: DateTime<Utc>,
    ) -> Result<WalletTransaction> {
        // Injected failures happen before any mutation, mirroring a rolled
        // back transaction.
        if self
            .fail_settlement_for
            .lock()
            .unwrap()
            .contains(&invoice.id)
        {
            bail!("wallet owner for invoice {} no longer exists", invoice.id);
        }

        let mut invoices = self.invoices.lock().unwrap();
        let stored = invoices
            .iter_mut()
            .find(|candidate| candidate.id == invoice.id)
            .ok_or_else(|| anyhow::anyhow!("invoice {} not found", invoice.id))?;
        if !stored.status.is_payable() {
            bail!("invoice {} is no longer payable", invoice.id);
        }
        stored.status = InvoiceStatus::Paid;
        stored.paid_at = Some(at);
        stored.updated_at = at;
        let net_amount = stored.net_amount.clone();
        let currency = stored.currency.clone();
        let user_id = stored.user_id;
        drop(invoices);

        let mut wallets = self.wallets.lock().unwrap();
        let wallet = wallets.entry(user_id).or_insert_with(|| Wallet {
            user_id,
            balance: BigDecimal::zero(),
            lifetime_earned: BigDecimal::zero(),
            currency,
            created_at: at,
            updated_at: at,
        });
        wallet.balance += net_amount.clone();
        wallet.lifetime_earned += net_amount.clone();
        wallet.updated_at = at;
        drop(wallets);

        let transaction = WalletTransaction {
            id: Uuid::new_v4(),
            user_id,
            tx_type: WalletTransactionType::Credit,
            amount: net_amount,
            invoice_id: Some(invoice.id),
            created_at: at,
        };
        self.wallet_transactions
            .lock()
            .unwrap()
            .push(transaction.clone());
        Ok(transaction)
    }

    async fn upsert_attendance(&self, row: &DailyAttendance) -> Result<AttendanceRecord> {
        let mut upserts = self.attendance_upserts.lock().unwrap();
        upserts.retain(|existing| !(existing.user_id == row.user_id && existing.day == row.day));
        upserts.push(row.clone());
        Ok(AttendanceRecord {
            id: Uuid::new_v4(),
            user_id: row.user_id,
            company_id: row.company_id,
            day: row.day,
            worked_seconds: row.worked_seconds,
            overtime_seconds: row.overtime_seconds,
            status: row.status.clone(),
        })
    }
}

// --- builders --------------------------------------------------------------

pub fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        environment: "test".to_string(),
        cache_capacity: 64,
        cache_sweep_seconds: 60,
        payroll_close_interval_seconds: 21600,
        attendance_rollup_interval_seconds: 86400,
    }
}

pub fn company(name: &str) -> Company {
    Company {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_active: true,
    }
}

pub fn employee(company_id: Uuid, name: &str) -> Employee {
    Employee {
        id: Uuid::new_v4(),
        company_id,
        full_name: name.to_string(),
        is_active: true,
        eligible_from: None,
    }
}

pub fn hourly_profile(user_id: Uuid, company_id: Uuid, rate: &str) -> PayRateProfile {
    PayRateProfile {
        user_id,
        company_id,
        salary_type: SalaryType::Hourly,
        hourly_rate: Some(dec(rate)),
        monthly_salary: None,
        expected_hours_per_day: Some(dec("8")),
        currency: None,
    }
}

pub fn monthly_profile(user_id: Uuid, company_id: Uuid, salary: &str) -> PayRateProfile {
    PayRateProfile {
        user_id,
        company_id,
        salary_type: SalaryType::Monthly,
        hourly_rate: None,
        monthly_salary: Some(dec(salary)),
        expected_hours_per_day: Some(dec("8")),
        currency: None,
    }
}

pub fn policy(company_id: Uuid, multiplier: &str, working_days: i32) -> CompanyPayPolicy {
    CompanyPayPolicy {
        company_id,
        overtime_multiplier: dec(multiplier),
        working_days_per_month: working_days,
        default_expected_hours: dec("8"),
    }
}

pub fn resolved_interval(user_id: Uuid, started_at: DateTime<Utc>, seconds: i64) -> WorkInterval {
    WorkInterval {
        id: Uuid::new_v4(),
        user_id,
        task_id: None,
        started_at,
        ended_at: Some(started_at + chrono::Duration::seconds(seconds)),
        duration_seconds: Some(seconds),
    }
}

pub fn open_interval(user_id: Uuid, started_at: DateTime<Utc>) -> WorkInterval {
    WorkInterval {
        id: Uuid::new_v4(),
        user_id,
        task_id: None,
        started_at,
        ended_at: None,
        duration_seconds: None,
    }
}

pub fn approved_leave(
    user_id: Uuid,
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
) -> LeaveRecord {
    LeaveRecord {
        id: Uuid::new_v4(),
        user_id,
        leave_type,
        status: LeaveStatus::Approved,
        start_date: start,
        end_date: end,
    }
}

pub fn attendance_row(
    user_id: Uuid,
    company_id: Uuid,
    day: NaiveDate,
    worked_seconds: i64,
    overtime_seconds: i64,
    status: AttendanceStatus,
) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        user_id,
        company_id,
        day,
        worked_seconds,
        overtime_seconds,
        status,
    }
}

pub fn penalty(user_id: Uuid, minutes: i64, window_start: DateTime<Utc>) -> PenaltyEvent {
    PenaltyEvent {
        id: Uuid::new_v4(),
        user_id,
        minutes,
        reason: Some("sustained low activity".to_string()),
        window_start,
        window_end: window_start + chrono::Duration::minutes(minutes),
    }
}

pub fn engine(store: std::sync::Arc<FakeStore>) -> PayrollEngine {
    PayrollEngine::new(store, &test_config())
}
