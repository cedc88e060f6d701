use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Invoice, Wallet, WalletTransaction};

#[derive(Clone)]
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>> {
        let wallet = sqlx::query_as::<_, Wallet>(
            r#"
            SELECT
                user_id,
                balance,
                lifetime_earned,
                currency,
                created_at,
                updated_at
            FROM
                wallets
            WHERE
                user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(wallet)
    }

    /// The settlement write: lazily create the wallet, flip the invoice to
    /// paid, credit the balance and append the ledger entry, all inside one
    /// transaction. Claiming the invoice first (status-guarded UPDATE) makes
    /// a concurrent double-settle lose cleanly.
    pub async fn settle_invoice(
        &self,
        invoice: &Invoice,
        at: DateTime<Utc>,
    ) -> Result<WalletTransaction> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO
                wallets (user_id, balance, lifetime_earned, currency, created_at, updated_at)
            VALUES
                ($1, 0, 0, $2, $3, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(invoice.user_id)
        .bind(&invoice.currency)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        let claimed = sqlx::query(
            r#"
            UPDATE invoices
            SET status = 'paid', paid_at = $2, updated_at = $2
            WHERE id = $1 AND status IN ('draft', 'approved')
            "#,
        )
        .bind(invoice.id)
        .bind(at)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            anyhow::bail!("invoice {} is no longer payable", invoice.id);
        }

        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = balance + $2,
                lifetime_earned = lifetime_earned + $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(invoice.user_id)
        .bind(&invoice.net_amount)
        .bind(at)
        .execute(&mut *tx)
        .await?;

        let transaction = sqlx::query_as::<_, WalletTransaction>(
            r#"
            INSERT INTO
                wallet_transactions (id, user_id, tx_type, amount, invoice_id, created_at)
            VALUES
                ($1, $2, 'credit', $3, $4, $5)
            RETURNING
                id,
                user_id,
                tx_type,
                amount,
                invoice_id,
                created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(invoice.user_id)
        .bind(&invoice.net_amount)
        .bind(invoice.id)
        .bind(at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(transaction)
    }
}
