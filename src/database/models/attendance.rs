use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// One row per user per calendar day, materialized by the daily rollup.
/// `overtime_seconds` is precomputed as `max(0, worked - expected)`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,         // UUID primary key
    pub user_id: Uuid,    // UUID for user references
    pub company_id: Uuid, // UUID for company references
    pub day: NaiveDate,   // DATE, unique per user
    pub worked_seconds: i64,
    pub overtime_seconds: i64,
    pub status: AttendanceStatus,
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Present => "present",
        Partial => "partial",
        Absent => "absent",
        OnLeave => "on_leave",
        Holiday => "holiday",
    }
}

impl AttendanceStatus {
    /// Days that count as worked for monthly-salary pay.
    pub fn counts_as_worked(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Partial)
    }
}

/// Input for the daily materialization upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub day: NaiveDate,
    pub worked_seconds: i64,
    pub overtime_seconds: i64,
    pub status: AttendanceStatus,
}
