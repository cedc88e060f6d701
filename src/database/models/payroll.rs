use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// One calendar month's payroll cycle for one company. At most one row per
/// (company, start date); created lazily when first touched.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub id: Uuid,              // UUID primary key
    pub company_id: Uuid,      // UUID for company references
    pub period_start: NaiveDate, // DATE, first day of the month
    pub period_end: NaiveDate,   // DATE, last day of the month
    pub status: PayPeriodStatus,
    pub total_amount: BigDecimal, // NUMERIC(14,2), sum of invoice net amounts
    pub currency: String,
    pub created_at: DateTime<Utc>, // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>, // TIMESTAMPTZ
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum PayPeriodStatus {
        Open => "open",
        Locked => "locked",
        Paid => "paid",
    }
}

/// One employee's computed pay for one pay period. Exactly one row per
/// (pay period, user); regeneration upserts in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,            // UUID primary key
    pub pay_period_id: Uuid, // UUID for pay period references
    pub user_id: Uuid,       // UUID for user references

    pub worked_hours: BigDecimal,
    pub worked_days: i32,
    pub paid_leave_days: BigDecimal,
    pub leave_hours: BigDecimal,
    pub overtime_hours: BigDecimal,
    pub penalty_hours: BigDecimal,
    pub worked_amount: BigDecimal,
    pub leave_pay: BigDecimal,
    pub overtime_pay: BigDecimal,
    pub penalty_amount: BigDecimal,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub currency: String,

    pub status: InvoiceStatus,
    pub approved_at: Option<DateTime<Utc>>, // TIMESTAMPTZ
    pub paid_at: Option<DateTime<Utc>>,     // TIMESTAMPTZ
    pub created_at: DateTime<Utc>,          // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,          // TIMESTAMPTZ
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Draft => "draft",
        Approved => "approved",
        Paid => "paid",
    }
}

impl InvoiceStatus {
    /// Settlement accepts drafts directly ("pay now") as well as approved
    /// invoices.
    pub fn is_payable(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Approved)
    }
}
