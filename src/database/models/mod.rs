pub mod attendance;
pub mod company;
pub mod earnings;
pub mod leave;
pub(crate) mod macros;
pub mod pay;
pub mod payroll;
pub mod penalty;
pub mod time_entry;
pub mod wallet;

// Re-export all models for easy importing
pub use attendance::{AttendanceRecord, AttendanceStatus, DailyAttendance};
pub use company::{Company, Employee};
pub use earnings::{EarningsBreakdown, EarningsDiagnostic, MarketComparison};
pub use leave::{LeaveRecord, LeaveStatus, LeaveType};
pub use pay::{
    CompanyPayPolicy, DEFAULT_CURRENCY, DEFAULT_EXPECTED_HOURS_PER_DAY,
    DEFAULT_WORKING_DAYS_PER_MONTH, PayRateProfile, SalaryType, TaskRate,
};
pub use payroll::{Invoice, InvoiceStatus, PayPeriod, PayPeriodStatus};
pub use penalty::PenaltyEvent;
pub use time_entry::WorkInterval;
pub use wallet::{Wallet, WalletTransaction, WalletTransactionType};
