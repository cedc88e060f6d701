use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::pay::{DEFAULT_CURRENCY, SalaryType};

/// The full result of one earnings calculation for one (user, period) pair.
/// Never persisted as its own entity; projected into an invoice.
///
/// Hours are rounded to 4 decimal places, money to 2, at every sub-total, so
/// recomputing over unchanged inputs reproduces the exact same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsBreakdown {
    pub user_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub salary_type: SalaryType,
    pub currency: String,

    pub total_worked_seconds: i64,
    pub worked_hours: BigDecimal,
    pub worked_days: i32,
    pub paid_leave_days: BigDecimal,
    pub leave_hours: BigDecimal,
    pub overtime_hours: BigDecimal,
    pub penalty_minutes: i64,
    pub penalty_hours: BigDecimal,

    pub worked_amount: BigDecimal,
    pub leave_pay: BigDecimal,
    pub overtime_pay: BigDecimal,
    pub penalty_amount: BigDecimal,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,

    /// Informational only; never feeds `net_amount`.
    pub market: Option<MarketComparison>,
    /// Set when the gross amount is zero, for operator debugging.
    pub diagnostic: Option<EarningsDiagnostic>,
    /// True when an in-progress interval contributed dynamic elapsed time.
    pub has_open_interval: bool,
}

impl EarningsBreakdown {
    pub fn zero(user_id: Uuid, period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            user_id,
            period_start,
            period_end,
            salary_type: SalaryType::Hourly,
            currency: DEFAULT_CURRENCY.to_string(),
            total_worked_seconds: 0,
            worked_hours: BigDecimal::zero(),
            worked_days: 0,
            paid_leave_days: BigDecimal::zero(),
            leave_hours: BigDecimal::zero(),
            overtime_hours: BigDecimal::zero(),
            penalty_minutes: 0,
            penalty_hours: BigDecimal::zero(),
            worked_amount: BigDecimal::zero(),
            leave_pay: BigDecimal::zero(),
            overtime_pay: BigDecimal::zero(),
            penalty_amount: BigDecimal::zero(),
            gross_amount: BigDecimal::zero(),
            net_amount: BigDecimal::zero(),
            market: None,
            diagnostic: None,
            has_open_interval: false,
        }
    }

    /// Whether this breakdown warrants an invoice at all.
    pub fn has_activity(&self) -> bool {
        !self.worked_hours.is_zero() || !self.paid_leave_days.is_zero()
    }
}

/// What the period's work would have cost if billed piecework instead of
/// salaried. Computed for monthly-salary users only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    pub virtual_hourly_rate: BigDecimal,
    pub actual_cost: BigDecimal,
    pub market_value: BigDecimal,
    pub savings: BigDecimal,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum EarningsDiagnostic {
        NoPayRate => "no_pay_rate",
        NoTimeLogs => "no_time_logs",
        ZeroCompensableHours => "zero_compensable_hours",
    }
}
