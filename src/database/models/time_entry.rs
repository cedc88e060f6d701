use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tracked stretch of work. While the timer runs, `ended_at` and
/// `duration_seconds` are both NULL and the elapsed time is derived on read.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkInterval {
    pub id: Uuid,              // UUID primary key
    pub user_id: Uuid,         // UUID for user references
    pub task_id: Option<Uuid>, // UUID for task references
    pub started_at: DateTime<Utc>, // TIMESTAMPTZ
    pub ended_at: Option<DateTime<Utc>>, // TIMESTAMPTZ
    pub duration_seconds: Option<i64>, // NULL while the timer is running
}

impl WorkInterval {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none() && self.duration_seconds.is_none()
    }
}
