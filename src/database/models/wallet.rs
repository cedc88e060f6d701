use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// One wallet per user, created lazily on first payout.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub user_id: Uuid, // UUID primary key
    pub balance: BigDecimal,
    pub lifetime_earned: BigDecimal,
    pub currency: String,
    pub created_at: DateTime<Utc>, // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>, // TIMESTAMPTZ
}

/// Append-only ledger entry. Settlement writes exactly one credit per
/// invoice transition to paid.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: Uuid,      // UUID primary key
    pub user_id: Uuid, // UUID for user references
    pub tx_type: WalletTransactionType,
    pub amount: BigDecimal,
    pub invoice_id: Option<Uuid>, // UUID for invoice references
    pub created_at: DateTime<Utc>, // TIMESTAMPTZ
}

string_enum! {
    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    pub enum WalletTransactionType {
        Credit => "credit",
        // Reserved for adjustments; the payroll engine itself never debits.
        Debit => "debit",
    }
}
