//! Pure calendar and rounding arithmetic for earnings calculations.
//!
//! Everything here is deterministic and I/O-free. Money rounds to 2 decimal
//! places, hours and derived rates to 4, half-up, so that recomputing a
//! period over unchanged inputs reproduces identical cent values.

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};

use crate::database::models::WorkInterval;

pub const SECONDS_PER_HOUR: i64 = 3600;

pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

pub fn round_hours(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(4, RoundingMode::HalfUp)
}

/// Derived rates (daily rate, monthly-to-hourly equivalents) keep 4 places
/// before they are applied to an hour count.
pub fn round_rate(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(4, RoundingMode::HalfUp)
}

pub fn is_business_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count of Mon-Fri days in the inclusive range. Zero when inverted.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut day = start;
    let mut count = 0;
    while day <= end {
        if is_business_day(day) {
            count += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}

/// Intersection of two inclusive date ranges.
pub fn overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    (start <= end).then_some((start, end))
}

/// First and last day of a calendar month. None for out-of-range input.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((start, end))
}

pub fn previous_month(of: NaiveDate) -> (i32, u32) {
    if of.month() == 1 {
        (of.year() - 1, 12)
    } else {
        (of.year(), of.month() - 1)
    }
}

/// UTC midnight at the start of `day`.
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Exclusive end bound: UTC midnight at the start of the following day.
/// Saturates at `day` itself only at the calendar's end.
pub fn day_end_utc(day: NaiveDate) -> DateTime<Utc> {
    day_start_utc(day.succ_opt().unwrap_or(day))
}

pub fn hours_from_seconds(seconds: i64) -> BigDecimal {
    round_hours(&(BigDecimal::from(seconds) / BigDecimal::from(SECONDS_PER_HOUR)))
}

/// The 0.5 day a half-day leave contributes, whatever its date range says.
pub fn half_day_unit() -> BigDecimal {
    BigDecimal::new(5.into(), 1)
}

/// Total worked seconds over a set of intervals, plus whether any of them is
/// still open. Resolved intervals contribute their stored duration; an
/// interval with an end but no duration contributes `end - start`; an open
/// interval contributes `now - start`, clamped at zero.
pub fn sum_worked_seconds(intervals: &[WorkInterval], now: DateTime<Utc>) -> (i64, bool) {
    let mut total = 0i64;
    let mut saw_open = false;
    for interval in intervals {
        if let Some(seconds) = interval.duration_seconds {
            total += seconds.max(0);
        } else if let Some(ended_at) = interval.ended_at {
            total += (ended_at - interval.started_at).num_seconds().max(0);
        } else {
            saw_open = true;
            total += (now - interval.started_at).num_seconds().max(0);
        }
    }
    (total, saw_open)
}

/// The hourly rate implied by a monthly salary over a concrete period:
/// `salary / (working_days * expected_hours_per_day)`. Zero when the
/// denominator degenerates.
pub fn hourly_equivalent_rate(
    monthly_salary: &BigDecimal,
    working_days: u32,
    expected_hours_per_day: &BigDecimal,
) -> BigDecimal {
    if working_days == 0 {
        return BigDecimal::zero();
    }
    let denominator = &BigDecimal::from(working_days) * expected_hours_per_day;
    if denominator.is_zero() {
        return BigDecimal::zero();
    }
    round_rate(&(monthly_salary / &denominator))
}
