pub mod attendance;
pub mod company;
pub mod leave;
pub mod pay;
pub mod payroll;
pub mod time_tracking;
pub mod wallet;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use company::CompanyRepository;
pub use leave::LeaveRepository;
pub use pay::PayRepository;
pub use payroll::PayrollRepository;
pub use time_tracking::TimeTrackingRepository;
pub use wallet::WalletRepository;
