use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    pub id: Uuid,      // UUID primary key
    pub user_id: Uuid, // UUID for user references
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    pub start_date: NaiveDate, // DATE
    pub end_date: NaiveDate,   // DATE
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveType {
        Paid => "paid",
        Sick => "sick",
        HalfDay => "half_day",
        Unpaid => "unpaid",
    }
}

impl LeaveType {
    /// Types that count towards paid leave days.
    pub fn paid_types() -> [LeaveType; 3] {
        [LeaveType::Paid, LeaveType::Sick, LeaveType::HalfDay]
    }
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum LeaveStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}
