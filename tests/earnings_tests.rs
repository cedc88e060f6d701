//! Calculator contracts: worked time, leave units, overtime, penalties,
//! salary-type arithmetic, diagnostics and determinism.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::{
    FakeStore, approved_leave, attendance_row, dec, date, hourly_profile, monthly_profile,
    open_interval, penalty, policy, resolved_interval, ts,
};
use workpulse_be::database::models::{
    AttendanceStatus, EarningsDiagnostic, LeaveType, TaskRate, WorkInterval,
};
use workpulse_be::services::EarningsCalculator;

fn calculator(store: &Arc<FakeStore>) -> EarningsCalculator {
    EarningsCalculator::new(Arc::clone(store) as _)
}

#[tokio::test]
async fn inverted_period_returns_zeros_without_store_reads() {
    let store = Arc::new(FakeStore::default());
    let user = Uuid::new_v4();

    let breakdown = calculator(&store)
        .calculate(user, date("2026-03-01"), date("2026-02-01"))
        .await
        .unwrap();

    assert_eq!(store.reads(), 0);
    assert_eq!(breakdown.worked_hours, dec("0"));
    assert_eq!(breakdown.gross_amount, dec("0"));
    assert_eq!(breakdown.net_amount, dec("0"));
    assert_eq!(breakdown.worked_days, 0);
    assert!(!breakdown.has_open_interval);
}

#[tokio::test]
async fn hourly_user_sums_resolved_intervals() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, hourly_profile(user, company, "100"));
    store
        .policies
        .lock()
        .unwrap()
        .insert(company, policy(company, "1.5", 22));
    store.intervals.lock().unwrap().extend([
        resolved_interval(user, ts("2026-02-10T09:00:00Z"), 3600),
        resolved_interval(user, ts("2026-02-10T11:00:00Z"), 1800),
    ]);

    let breakdown = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();

    assert_eq!(breakdown.total_worked_seconds, 5400);
    assert_eq!(breakdown.worked_hours, dec("1.5"));
    assert_eq!(breakdown.worked_amount, dec("150.00"));
    assert_eq!(breakdown.gross_amount, dec("150.00"));
    assert_eq!(breakdown.net_amount, dec("150.00"));
    assert!(breakdown.diagnostic.is_none());
    assert!(breakdown.market.is_none(), "hourly users get no market block");
}

#[tokio::test]
async fn open_interval_accrues_elapsed_time_dynamically() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, hourly_profile(user, company, "100"));
    store
        .intervals
        .lock()
        .unwrap()
        .push(open_interval(user, ts("2026-02-10T09:00:00Z")));

    let breakdown = calculator(&store)
        .calculate_at(
            user,
            date("2026-02-01"),
            date("2026-02-28"),
            ts("2026-02-10T09:30:00Z"),
        )
        .await
        .unwrap();

    assert!(breakdown.has_open_interval);
    assert_eq!(breakdown.total_worked_seconds, 1800);
    assert_eq!(breakdown.worked_hours, dec("0.5"));
    assert_eq!(breakdown.worked_amount, dec("50.00"));
}

#[tokio::test]
async fn monthly_user_is_paid_by_worked_and_leave_days() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, monthly_profile(user, company, "22000"));
    store
        .policies
        .lock()
        .unwrap()
        .insert(company, policy(company, "1.5", 22));
    // 20 present weekdays in March 2026
    let mut attendance = store.attendance.lock().unwrap();
    for day in [
        "2026-03-02", "2026-03-03", "2026-03-04", "2026-03-05", "2026-03-06", "2026-03-09",
        "2026-03-10", "2026-03-11", "2026-03-12", "2026-03-13", "2026-03-16", "2026-03-17",
        "2026-03-18", "2026-03-19", "2026-03-20", "2026-03-23", "2026-03-24", "2026-03-25",
        "2026-03-26", "2026-03-27",
    ] {
        attendance.push(attendance_row(
            user,
            company,
            date(day),
            28800,
            0,
            AttendanceStatus::Present,
        ));
    }
    drop(attendance);
    // Mon 30th and Tue 31st as paid leave
    store.leaves.lock().unwrap().push(approved_leave(
        user,
        LeaveType::Paid,
        date("2026-03-30"),
        date("2026-03-31"),
    ));

    let breakdown = calculator(&store)
        .calculate(user, date("2026-03-01"), date("2026-03-31"))
        .await
        .unwrap();

    assert_eq!(breakdown.worked_days, 20);
    assert_eq!(breakdown.paid_leave_days, dec("2"));
    // daily rate 22000 / 22 = 1000.00
    assert_eq!(breakdown.worked_amount, dec("20000.00"));
    assert_eq!(breakdown.leave_pay, dec("2000.00"));
    assert_eq!(breakdown.gross_amount, dec("22000.00"));
    assert_eq!(breakdown.net_amount, dec("22000.00"));
}

#[tokio::test]
async fn half_day_leave_is_half_a_day_regardless_of_range() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, hourly_profile(user, company, "100"));

    store.leaves.lock().unwrap().push(approved_leave(
        user,
        LeaveType::HalfDay,
        date("2026-02-10"),
        date("2026-02-10"),
    ));
    let single_day = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();
    assert_eq!(single_day.paid_leave_days, dec("0.5"));
    assert_eq!(single_day.leave_hours, dec("4"));
    assert_eq!(single_day.leave_pay, dec("400.00"));

    // A half-day record spanning a whole week still contributes 0.5.
    store.leaves.lock().unwrap().clear();
    store.leaves.lock().unwrap().push(approved_leave(
        user,
        LeaveType::HalfDay,
        date("2026-02-16"),
        date("2026-02-20"),
    ));
    let week_long = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();
    assert_eq!(week_long.paid_leave_days, dec("0.5"));
}

#[tokio::test]
async fn overtime_applies_the_company_multiplier() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, hourly_profile(user, company, "100"));
    store
        .policies
        .lock()
        .unwrap()
        .insert(company, policy(company, "1.5", 22));
    store.attendance.lock().unwrap().push(attendance_row(
        user,
        company,
        date("2026-02-10"),
        32400,
        3600,
        AttendanceStatus::Present,
    ));

    let breakdown = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();

    assert_eq!(breakdown.overtime_hours, dec("1"));
    assert_eq!(breakdown.overtime_pay, dec("150.00"));
}

#[tokio::test]
async fn penalties_reduce_net_but_never_gross_and_never_below_zero() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, hourly_profile(user, company, "100"));
    store
        .intervals
        .lock()
        .unwrap()
        .push(resolved_interval(user, ts("2026-02-10T09:00:00Z"), 3600));
    store
        .penalties
        .lock()
        .unwrap()
        .push(penalty(user, 90, ts("2026-02-11T14:00:00Z")));

    let breakdown = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();

    assert_eq!(breakdown.penalty_minutes, 90);
    assert_eq!(breakdown.penalty_hours, dec("1.5"));
    assert_eq!(breakdown.penalty_amount, dec("150.00"));
    assert_eq!(breakdown.gross_amount, dec("100.00"));
    assert_eq!(breakdown.net_amount, dec("0"));
}

#[tokio::test]
async fn recomputation_over_unchanged_inputs_is_identical() {
    let store = Arc::new(FakeStore::default());
    let (user, company) = (Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, monthly_profile(user, company, "35000"));
    store
        .policies
        .lock()
        .unwrap()
        .insert(company, policy(company, "1.25", 22));
    store.intervals.lock().unwrap().extend([
        resolved_interval(user, ts("2026-02-03T09:00:00Z"), 12345),
        open_interval(user, ts("2026-02-04T09:00:00Z")),
    ]);
    store.attendance.lock().unwrap().push(attendance_row(
        user,
        company,
        date("2026-02-03"),
        12345,
        0,
        AttendanceStatus::Partial,
    ));
    store
        .penalties
        .lock()
        .unwrap()
        .push(penalty(user, 17, ts("2026-02-05T10:00:00Z")));

    let now = ts("2026-02-04T18:00:00Z");
    let calc = calculator(&store);
    let first = calc
        .calculate_at(user, date("2026-02-01"), date("2026-02-28"), now)
        .await
        .unwrap();
    let second = calc
        .calculate_at(user, date("2026-02-01"), date("2026-02-28"), now)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn market_comparison_prices_monthly_work_at_task_rates() {
    let store = Arc::new(FakeStore::default());
    let (user, company, task) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    store
        .profiles
        .lock()
        .unwrap()
        .insert(user, monthly_profile(user, company, "22000"));
    store
        .policies
        .lock()
        .unwrap()
        .insert(company, policy(company, "1.5", 22));
    store.intervals.lock().unwrap().push(WorkInterval {
        task_id: Some(task),
        ..resolved_interval(user, ts("2026-02-10T09:00:00Z"), 7200)
    });
    store.attendance.lock().unwrap().push(attendance_row(
        user,
        company,
        date("2026-02-10"),
        7200,
        0,
        AttendanceStatus::Present,
    ));
    store.task_rates.lock().unwrap().push(TaskRate {
        task_id: task,
        hourly_rate: Some(dec("200")),
        top_subtask_rate: None,
        fixed_price_total: None,
    });

    let breakdown = calculator(&store)
        .calculate(user, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();

    let market = breakdown.market.expect("monthly users get a market block");
    // February 2026 has 20 business days: 22000 / (20 * 8) = 137.5
    assert_eq!(market.virtual_hourly_rate, dec("137.5"));
    assert_eq!(market.actual_cost, dec("275.00"));
    assert_eq!(market.market_value, dec("400.00"));
    assert_eq!(market.savings, dec("125.00"));
    // The informational block never feeds the payable amount.
    assert_eq!(breakdown.net_amount, dec("1000.00"));
}

#[tokio::test]
async fn zero_gross_carries_a_diagnostic() {
    let store = Arc::new(FakeStore::default());
    let company = Uuid::new_v4();

    // No pay profile at all.
    let unconfigured = Uuid::new_v4();
    store
        .intervals
        .lock()
        .unwrap()
        .push(resolved_interval(unconfigured, ts("2026-02-10T09:00:00Z"), 3600));
    let breakdown = calculator(&store)
        .calculate(unconfigured, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();
    assert_eq!(breakdown.diagnostic, Some(EarningsDiagnostic::NoPayRate));

    // Configured rate but no facts at all.
    let idle = Uuid::new_v4();
    store
        .profiles
        .lock()
        .unwrap()
        .insert(idle, hourly_profile(idle, company, "100"));
    let breakdown = calculator(&store)
        .calculate(idle, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();
    assert_eq!(breakdown.diagnostic, Some(EarningsDiagnostic::NoTimeLogs));

    // Facts exist but none of them are compensable.
    let absent = Uuid::new_v4();
    store
        .profiles
        .lock()
        .unwrap()
        .insert(absent, monthly_profile(absent, company, "22000"));
    store.attendance.lock().unwrap().push(attendance_row(
        absent,
        company,
        date("2026-02-10"),
        0,
        0,
        AttendanceStatus::Absent,
    ));
    let breakdown = calculator(&store)
        .calculate(absent, date("2026-02-01"), date("2026-02-28"))
        .await
        .unwrap();
    assert_eq!(
        breakdown.diagnostic,
        Some(EarningsDiagnostic::ZeroCompensableHours)
    );
}
