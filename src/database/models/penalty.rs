use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logged deduction, in minutes, attributable to a user within a time
/// window (e.g. a sustained low-activity stretch flagged by monitoring).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyEvent {
    pub id: Uuid,      // UUID primary key
    pub user_id: Uuid, // UUID for user references
    pub minutes: i64,
    pub reason: Option<String>,
    pub window_start: DateTime<Utc>, // TIMESTAMPTZ
    pub window_end: DateTime<Utc>,   // TIMESTAMPTZ
}
