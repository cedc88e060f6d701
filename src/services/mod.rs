pub mod earnings;
pub mod earnings_cache;
pub mod events;
pub mod payroll;
pub mod period_math;
pub mod scheduler;
pub mod settlement;
pub mod store;

pub use earnings::{EarningsCalculator, EarningsService};
pub use earnings_cache::EarningsCache;
pub use events::EarningsEvent;
pub use payroll::{InvoiceGeneration, PayrollService};
pub use scheduler::{
    AttendanceRollupReport, MonthlyCloseReport, PayrollScheduler, SchedulerHandle,
};
pub use settlement::{InvoiceSettlement, SettlementReport, SettlementService};
pub use store::PayrollStore;
