//! Settlement: the sole writer of wallets and the wallet ledger. Credits an
//! invoice's net amount and marks it paid in one atomic unit.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{PayPeriodStatus, WalletTransaction};
use crate::error::AppError;

use super::store::PayrollStore;

/// Per-invoice result of a period-wide settlement run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSettlement {
    pub invoice_id: Uuid,
    pub user_id: Uuid,
    pub amount: BigDecimal,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    pub pay_period_id: Uuid,
    pub settled: usize,
    pub failed: usize,
    pub outcomes: Vec<InvoiceSettlement>,
}

pub struct SettlementService {
    store: Arc<dyn PayrollStore>,
}

impl SettlementService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    /// Pay one invoice (draft or approved). Wallet creation is lazy; the
    /// credit, the ledger entry and the status flip commit together.
    pub async fn pay_invoice(&self, invoice_id: Uuid) -> Result<WalletTransaction, AppError> {
        let invoice = self
            .store
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("invoice {invoice_id}")))?;
        if !invoice.status.is_payable() {
            return Err(AppError::InvalidState(format!(
                "invoice {} is already {}",
                invoice.id, invoice.status
            )));
        }
        let transaction = self.store.settle_invoice(&invoice, Utc::now()).await?;
        log::info!(
            "settled invoice {}: credited {} {} to user {}",
            invoice.id,
            transaction.amount,
            invoice.currency,
            invoice.user_id
        );
        Ok(transaction)
    }

    /// Pay every payable invoice of a period, isolating failures per invoice,
    /// then mark the period paid. Callers inspect the outcome list for
    /// partial failures.
    pub async fn pay_all_invoices(
        &self,
        pay_period_id: Uuid,
    ) -> Result<SettlementReport, AppError> {
        let period = self
            .store
            .get_pay_period(pay_period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pay period {pay_period_id}")))?;

        let invoices = self.store.list_invoices(period.id).await?;
        let mut outcomes = Vec::new();
        let mut settled = 0;
        let mut failed = 0;

        for invoice in invoices.iter().filter(|i| i.status.is_payable()) {
            match self.store.settle_invoice(invoice, Utc::now()).await {
                Ok(transaction) => {
                    settled += 1;
                    outcomes.push(InvoiceSettlement {
                        invoice_id: invoice.id,
                        user_id: invoice.user_id,
                        amount: transaction.amount,
                        error: None,
                    });
                }
                Err(err) => {
                    failed += 1;
                    log::warn!("failed to settle invoice {}: {err:#}", invoice.id);
                    outcomes.push(InvoiceSettlement {
                        invoice_id: invoice.id,
                        user_id: invoice.user_id,
                        amount: invoice.net_amount.clone(),
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        self.store
            .set_pay_period_status(period.id, PayPeriodStatus::Paid)
            .await?;
        log::info!(
            "pay period {} settled: {} paid, {} failed",
            period.id,
            settled,
            failed
        );
        Ok(SettlementReport {
            pay_period_id: period.id,
            settled,
            failed,
            outcomes,
        })
    }
}
