use uuid::Uuid;

/// A mutation elsewhere in the platform that changes what an earnings
/// calculation would return. The owning operation emits the event through
/// `PayrollEngine::publish`; cached breakdowns for the affected scope are
/// dropped in response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarningsEvent {
    /// A leave request was approved, rejected or cancelled.
    LeaveStatusChanged { user_id: Uuid },
    /// Screenshots or activity samples were ingested for a user.
    ActivityIngested { user_id: Uuid },
    /// A task's rate or tracking parameters changed. Attribution of
    /// historical time to the old rate is ambiguous afterwards, so the
    /// whole cache is cleared rather than guessing which users are touched.
    TaskRateChanged,
}
