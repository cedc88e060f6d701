use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// Ledger currency used when neither the user profile nor the company
/// policy names one.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Company working days per month used for daily-rate derivation when the
/// policy leaves it unset.
pub const DEFAULT_WORKING_DAYS_PER_MONTH: u32 = 22;

/// Expected tracked hours per day when no profile or policy value exists.
pub const DEFAULT_EXPECTED_HOURS_PER_DAY: u32 = 8;

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum SalaryType {
        Hourly => "hourly",
        Monthly => "monthly",
    }
}

/// Per-user pay configuration. Any unset field falls back to the company
/// policy, then to the crate defaults above.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayRateProfile {
    pub user_id: Uuid,    // UUID for user references
    pub company_id: Uuid, // UUID for company references
    pub salary_type: SalaryType,
    pub hourly_rate: Option<BigDecimal>,    // NUMERIC(12,2)
    pub monthly_salary: Option<BigDecimal>, // NUMERIC(12,2)
    pub expected_hours_per_day: Option<BigDecimal>, // NUMERIC(4,2)
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayPolicy {
    pub company_id: Uuid, // UUID primary key
    pub overtime_multiplier: BigDecimal, // NUMERIC(3,2)
    pub working_days_per_month: i32,
    pub default_expected_hours: BigDecimal, // NUMERIC(4,2)
}

/// Billing data for one task, used for the market-value comparison of
/// monthly-salaried work. The effective hourly rate is the task's own rate
/// or, failing that, its highest-rate sub-task.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskRate {
    pub task_id: Uuid,
    pub hourly_rate: Option<BigDecimal>,
    pub top_subtask_rate: Option<BigDecimal>,
    pub fixed_price_total: Option<BigDecimal>,
}

impl TaskRate {
    pub fn effective_hourly_rate(&self) -> Option<&BigDecimal> {
        self.hourly_rate.as_ref().or(self.top_subtask_rate.as_ref())
    }
}
