use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid, // UUID primary key
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,         // UUID primary key, same id as the platform user
    pub company_id: Uuid, // UUID for company references
    pub full_name: String,
    pub is_active: bool,
    pub eligible_from: Option<NaiveDate>, // payroll eligibility start, if later than hire
}
