//! Pay period and invoice lifecycle: lazy period creation, invoice
//! materialization from earnings breakdowns, and the forward-only status
//! transitions up to settlement.

use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{DEFAULT_CURRENCY, Invoice, PayPeriod, PayPeriodStatus};
use crate::error::AppError;

use super::earnings::EarningsService;
use super::period_math::month_bounds;
use super::store::PayrollStore;

/// Outcome of one invoice-generation pass over a period.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceGeneration {
    pub pay_period_id: Uuid,
    pub invoices: Vec<Invoice>,
    /// Employees with zero worked hours and zero leave days; no invoice row
    /// is created for them.
    pub skipped_users: Vec<Uuid>,
    pub total_net: BigDecimal,
}

pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    earnings: Arc<EarningsService>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn PayrollStore>, earnings: Arc<EarningsService>) -> Self {
        Self { store, earnings }
    }

    /// Idempotent get-or-create of a company's period for one calendar month.
    pub async fn ensure_period(
        &self,
        company_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<PayPeriod, AppError> {
        let (period_start, period_end) = month_bounds(year, month)
            .ok_or_else(|| AppError::BadRequest(format!("invalid month {year}-{month:02}")))?;
        if let Some(existing) = self.store.find_pay_period(company_id, period_start).await? {
            return Ok(existing);
        }
        let period = self
            .store
            .create_pay_period(company_id, period_start, period_end, DEFAULT_CURRENCY)
            .await?;
        log::info!(
            "opened pay period {} for company {} ({} .. {})",
            period.id,
            company_id,
            period_start,
            period_end
        );
        Ok(period)
    }

    /// Materialize one draft invoice per eligible employee with activity in
    /// the period, then refresh the period total. Re-running upserts in
    /// place; a paid period refuses regeneration.
    pub async fn generate_invoices(
        &self,
        pay_period_id: Uuid,
    ) -> Result<InvoiceGeneration, AppError> {
        let period = self
            .store
            .get_pay_period(pay_period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pay period {pay_period_id}")))?;
        if period.status == PayPeriodStatus::Paid {
            return Err(AppError::InvalidState(format!(
                "pay period {} is already paid",
                period.id
            )));
        }

        let employees = self.store.list_eligible_employees(period.company_id).await?;
        let mut invoices = Vec::new();
        let mut skipped_users = Vec::new();
        let mut total_net = BigDecimal::zero();

        for employee in employees {
            // Clamp to the employee's eligibility start; for someone whose
            // eligibility begins after this period the range inverts and the
            // calculator returns zeros.
            let start = match employee.eligible_from {
                Some(from) if from > period.period_start => from,
                _ => period.period_start,
            };
            let breakdown = self
                .earnings
                .calculate(employee.id, start, period.period_end)
                .await?;
            if !breakdown.has_activity() {
                skipped_users.push(employee.id);
                continue;
            }
            let invoice = self.store.upsert_invoice(period.id, &breakdown).await?;
            total_net += invoice.net_amount.clone();
            invoices.push(invoice);
        }

        self.store.set_pay_period_total(period.id, &total_net).await?;
        log::info!(
            "generated {} invoices ({} skipped) for pay period {}, total {}",
            invoices.len(),
            skipped_users.len(),
            period.id,
            total_net
        );
        Ok(InvoiceGeneration {
            pay_period_id: period.id,
            invoices,
            skipped_users,
            total_net,
        })
    }

    /// OPEN -> LOCKED. Callers must not regenerate invoices afterwards.
    pub async fn lock_period(&self, pay_period_id: Uuid) -> Result<PayPeriod, AppError> {
        let period = self
            .store
            .get_pay_period(pay_period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pay period {pay_period_id}")))?;
        if period.status != PayPeriodStatus::Open {
            return Err(AppError::InvalidState(format!(
                "pay period {} is {}, only open periods can be locked",
                period.id, period.status
            )));
        }
        self.store
            .set_pay_period_status(period.id, PayPeriodStatus::Locked)
            .await
            .map_err(Into::into)
    }

    /// DRAFT -> APPROVED.
    pub async fn approve_invoice(&self, invoice_id: Uuid) -> Result<Invoice, AppError> {
        match self.store.approve_invoice(invoice_id, Utc::now()).await? {
            Some(invoice) => Ok(invoice),
            None => match self.store.get_invoice(invoice_id).await? {
                Some(invoice) => Err(AppError::InvalidState(format!(
                    "invoice {} is {}, only drafts can be approved",
                    invoice.id, invoice.status
                ))),
                None => Err(AppError::NotFound(format!("invoice {invoice_id}"))),
            },
        }
    }
}
