//! Earnings calculation: turns time-tracking facts into one reproducible
//! monetary breakdown per (user, period).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::{BigDecimal, One, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    DEFAULT_CURRENCY, DEFAULT_EXPECTED_HOURS_PER_DAY, DEFAULT_WORKING_DAYS_PER_MONTH,
    EarningsBreakdown, EarningsDiagnostic, LeaveType, MarketComparison, SalaryType, WorkInterval,
};
use crate::error::AppError;

use super::earnings_cache::EarningsCache;
use super::events::EarningsEvent;
use super::period_math::{
    business_days_between, day_end_utc, day_start_utc, half_day_unit, hourly_equivalent_rate,
    hours_from_seconds, overlap, round_hours, round_money, sum_worked_seconds,
};
use super::store::PayrollStore;

/// Per-user pay settings merged with company policy and crate defaults.
struct ResolvedPayProfile {
    salary_type: SalaryType,
    hourly_rate: BigDecimal,
    monthly_salary: BigDecimal,
    expected_hours_per_day: BigDecimal,
    overtime_multiplier: BigDecimal,
    working_days_per_month: u32,
    currency: String,
    has_rate: bool,
}

pub struct EarningsCalculator {
    store: Arc<dyn PayrollStore>,
}

impl EarningsCalculator {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        Self { store }
    }

    pub async fn calculate(
        &self,
        user_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<EarningsBreakdown, AppError> {
        self.calculate_at(user_id, period_start, period_end, Utc::now())
            .await
    }

    /// The full calculation with an explicit clock, so open-interval elapsed
    /// time is reproducible.
    pub async fn calculate_at(
        &self,
        user_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<EarningsBreakdown, AppError> {
        // An inverted range means the user's eligibility window hasn't
        // started: return zeros without touching the store.
        if period_start > period_end {
            return Ok(EarningsBreakdown::zero(user_id, period_start, period_end));
        }

        let profile = self.resolve_profile(user_id).await?;
        let range_start = day_start_utc(period_start);
        let range_end = day_end_utc(period_end);

        let intervals = self
            .store
            .find_work_intervals(user_id, range_start, range_end)
            .await?;
        let (total_worked_seconds, has_open_interval) = sum_worked_seconds(&intervals, now);
        let worked_hours = hours_from_seconds(total_worked_seconds);

        let leaves = self
            .store
            .find_approved_leaves(user_id, period_start, period_end, &LeaveType::paid_types())
            .await?;
        let mut paid_leave_days = BigDecimal::zero();
        for leave in &leaves {
            let Some((overlap_start, overlap_end)) =
                overlap(leave.start_date, leave.end_date, period_start, period_end)
            else {
                continue;
            };
            if leave.leave_type == LeaveType::HalfDay {
                // A half-day is half a day no matter how the record is dated.
                paid_leave_days += half_day_unit();
            } else {
                paid_leave_days +=
                    BigDecimal::from(business_days_between(overlap_start, overlap_end));
            }
        }
        let leave_hours = round_hours(&(&paid_leave_days * &profile.expected_hours_per_day));

        let attendance = self
            .store
            .find_attendance(user_id, period_start, period_end)
            .await?;
        let overtime_seconds: i64 = attendance.iter().map(|a| a.overtime_seconds.max(0)).sum();
        let overtime_hours = hours_from_seconds(overtime_seconds);
        let worked_days = attendance
            .iter()
            .filter(|a| a.status.counts_as_worked())
            .count() as i32;

        let penalties = self
            .store
            .find_penalty_events(user_id, range_start, range_end)
            .await?;
        let penalty_minutes: i64 = penalties.iter().map(|p| p.minutes.max(0)).sum();
        let penalty_hours = round_hours(&(BigDecimal::from(penalty_minutes) / BigDecimal::from(60)));

        let working_days_in_range = business_days_between(period_start, period_end);

        let (worked_amount, leave_pay, overtime_pay, penalty_amount) = match profile.salary_type {
            SalaryType::Monthly => {
                let daily_rate = round_money(
                    &(&profile.monthly_salary
                        / &BigDecimal::from(profile.working_days_per_month)),
                );
                let worked_amount = round_money(&(&BigDecimal::from(worked_days) * &daily_rate));
                let leave_pay = round_money(&(&paid_leave_days * &daily_rate));
                let equivalent_rate = hourly_equivalent_rate(
                    &profile.monthly_salary,
                    working_days_in_range,
                    &profile.expected_hours_per_day,
                );
                let overtime_pay = round_money(
                    &(&(&overtime_hours * &equivalent_rate) * &profile.overtime_multiplier),
                );
                let penalty_amount = round_money(&(&penalty_hours * &equivalent_rate));
                (worked_amount, leave_pay, overtime_pay, penalty_amount)
            }
            SalaryType::Hourly => {
                let worked_amount = round_money(&(&worked_hours * &profile.hourly_rate));
                let leave_pay = round_money(&(&leave_hours * &profile.hourly_rate));
                let overtime_pay = round_money(
                    &(&(&overtime_hours * &profile.hourly_rate) * &profile.overtime_multiplier),
                );
                let penalty_amount = round_money(&(&penalty_hours * &profile.hourly_rate));
                (worked_amount, leave_pay, overtime_pay, penalty_amount)
            }
        };

        // Penalties never reduce the gross figure; they come off at net.
        let gross_amount = round_money(&(&(&worked_amount + &leave_pay) + &overtime_pay));
        let net_amount = {
            let net = &gross_amount - &penalty_amount;
            if net < BigDecimal::zero() {
                BigDecimal::zero()
            } else {
                round_money(&net)
            }
        };

        let market = self
            .market_comparison(&intervals, &worked_hours, &profile, working_days_in_range, now)
            .await?;

        let diagnostic = if gross_amount.is_zero() {
            Some(if !profile.has_rate {
                EarningsDiagnostic::NoPayRate
            } else if intervals.is_empty() && attendance.is_empty() && leaves.is_empty() {
                EarningsDiagnostic::NoTimeLogs
            } else {
                EarningsDiagnostic::ZeroCompensableHours
            })
        } else {
            None
        };

        Ok(EarningsBreakdown {
            user_id,
            period_start,
            period_end,
            salary_type: profile.salary_type,
            currency: profile.currency,
            total_worked_seconds,
            worked_hours,
            worked_days,
            paid_leave_days,
            leave_hours,
            overtime_hours,
            penalty_minutes,
            penalty_hours,
            worked_amount,
            leave_pay,
            overtime_pay,
            penalty_amount,
            gross_amount,
            net_amount,
            market,
            diagnostic,
            has_open_interval,
        })
    }

    async fn resolve_profile(&self, user_id: Uuid) -> Result<ResolvedPayProfile, AppError> {
        let profile = self.store.get_pay_profile(user_id).await?;
        let policy = match &profile {
            Some(p) => self.store.get_company_pay_policy(p.company_id).await?,
            None => None,
        };

        let default_expected = BigDecimal::from(DEFAULT_EXPECTED_HOURS_PER_DAY);
        let (overtime_multiplier, working_days_per_month, policy_expected) = match policy {
            Some(p) => {
                let working_days = if p.working_days_per_month > 0 {
                    p.working_days_per_month as u32
                } else {
                    DEFAULT_WORKING_DAYS_PER_MONTH
                };
                (p.overtime_multiplier, working_days, p.default_expected_hours)
            }
            None => (
                BigDecimal::one(),
                DEFAULT_WORKING_DAYS_PER_MONTH,
                default_expected.clone(),
            ),
        };

        Ok(match profile {
            Some(p) => {
                let hourly_rate = p.hourly_rate.unwrap_or_else(BigDecimal::zero);
                let monthly_salary = p.monthly_salary.unwrap_or_else(BigDecimal::zero);
                let has_rate = match p.salary_type {
                    SalaryType::Hourly => !hourly_rate.is_zero(),
                    SalaryType::Monthly => !monthly_salary.is_zero(),
                };
                let expected = p
                    .expected_hours_per_day
                    .filter(|hours| !hours.is_zero())
                    .unwrap_or(policy_expected);
                ResolvedPayProfile {
                    salary_type: p.salary_type,
                    hourly_rate,
                    monthly_salary,
                    expected_hours_per_day: if expected.is_zero() {
                        default_expected
                    } else {
                        expected
                    },
                    overtime_multiplier,
                    working_days_per_month,
                    currency: p.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    has_rate,
                }
            }
            None => ResolvedPayProfile {
                salary_type: SalaryType::Hourly,
                hourly_rate: BigDecimal::zero(),
                monthly_salary: BigDecimal::zero(),
                expected_hours_per_day: default_expected,
                overtime_multiplier,
                working_days_per_month,
                currency: DEFAULT_CURRENCY.to_string(),
                has_rate: false,
            },
        })
    }

    /// "What would this work have cost if billed piecework instead of
    /// salaried." Monthly users only; purely informational.
    async fn market_comparison(
        &self,
        intervals: &[WorkInterval],
        worked_hours: &BigDecimal,
        profile: &ResolvedPayProfile,
        working_days_in_range: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<MarketComparison>, AppError> {
        if profile.salary_type != SalaryType::Monthly || !profile.has_rate {
            return Ok(None);
        }

        let mut seconds_per_task: HashMap<Uuid, i64> = HashMap::new();
        for interval in intervals {
            let Some(task_id) = interval.task_id else {
                continue;
            };
            let (seconds, _) = sum_worked_seconds(std::slice::from_ref(interval), now);
            *seconds_per_task.entry(task_id).or_insert(0) += seconds;
        }

        let virtual_hourly_rate = hourly_equivalent_rate(
            &profile.monthly_salary,
            working_days_in_range,
            &profile.expected_hours_per_day,
        );
        let actual_cost = round_money(&(worked_hours * &virtual_hourly_rate));

        let mut market_value = BigDecimal::zero();
        if !seconds_per_task.is_empty() {
            let task_ids: Vec<Uuid> = seconds_per_task.keys().copied().collect();
            let rates = self.store.find_task_rates(&task_ids).await?;
            for rate in &rates {
                let Some(seconds) = seconds_per_task.get(&rate.task_id) else {
                    continue;
                };
                let task_hours = hours_from_seconds(*seconds);
                if let Some(hourly) = rate.effective_hourly_rate() {
                    market_value += round_money(&(&task_hours * hourly));
                }
                if let Some(fixed) = &rate.fixed_price_total {
                    market_value += round_money(fixed);
                }
            }
        }

        let savings = round_money(&(&market_value - &actual_cost));
        Ok(Some(MarketComparison {
            virtual_hourly_rate,
            actual_cost,
            market_value,
            savings,
        }))
    }
}

/// The cached calculator the rest of the engine (and the host application)
/// goes through.
pub struct EarningsService {
    calculator: EarningsCalculator,
    cache: EarningsCache,
}

impl EarningsService {
    pub fn new(store: Arc<dyn PayrollStore>, cache_capacity: usize, sweep_every: Duration) -> Self {
        Self {
            calculator: EarningsCalculator::new(store),
            cache: EarningsCache::new(cache_capacity, sweep_every),
        }
    }

    /// Cached by (user, period start). Concurrent misses for the same key may
    /// compute twice; the result is identical either way.
    pub async fn calculate(
        &self,
        user_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<EarningsBreakdown, AppError> {
        if let Some(hit) = self.cache.get(user_id, period_start) {
            return Ok(hit);
        }
        let breakdown = self
            .calculator
            .calculate(user_id, period_start, period_end)
            .await?;
        self.cache.put(&breakdown);
        Ok(breakdown)
    }

    /// Drop cached results for one user, or everything when `None`.
    pub fn invalidate(&self, user_id: Option<Uuid>) {
        self.cache.invalidate(user_id);
    }

    /// React to a mutation elsewhere in the platform that changes what a
    /// calculation would return.
    pub fn publish(&self, event: &EarningsEvent) {
        match event {
            EarningsEvent::LeaveStatusChanged { user_id }
            | EarningsEvent::ActivityIngested { user_id } => self.invalidate(Some(*user_id)),
            EarningsEvent::TaskRateChanged => self.invalidate(None),
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}
