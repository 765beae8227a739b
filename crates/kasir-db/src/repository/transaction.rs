//! Sale header and item storage.
//!
//! Headers and items are only ever written together inside the sale
//! workflow's database transaction; see `insert_header` and `insert_item`.
//! Afterwards only the header status may change.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::sale::PricedLine;
use kasir_core::{Money, Transaction, TransactionDetail, TransactionItem, TransactionStatus};

const TRANSACTION_SELECT: &str = r#"
    SELECT
        t.id,
        t.user_id,
        u.username AS cashier_username,
        t.total_amount,
        t.payment_method,
        t.customer_name,
        t.status,
        t.transaction_date
    FROM transactions t
    JOIN users u ON u.id = t.user_id
"#;

/// Header fields for a new sale.
#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub user_id: i64,
    pub total_amount: Money,
    pub payment_method: &'a str,
    pub customer_name: Option<&'a str>,
    pub status: TransactionStatus,
    pub transaction_date: DateTime<Utc>,
}

/// Repository for `transactions` and `transaction_items`.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// All sales, newest first, with the cashier's username.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            "{TRANSACTION_SELECT} ORDER BY t.transaction_date DESC, t.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let transaction =
            sqlx::query_as::<_, Transaction>(&format!("{TRANSACTION_SELECT} WHERE t.id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(transaction)
    }

    /// Items of one sale in insertion order, with product SKU and name.
    pub async fn items(&self, transaction_id: i64) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT
                ti.id,
                ti.transaction_id,
                ti.product_id,
                p.sku,
                p.name AS product_name,
                ti.quantity,
                ti.unit_price,
                ti.subtotal
            FROM transaction_items ti
            JOIN products p ON p.id = ti.product_id
            WHERE ti.transaction_id = ?1
            ORDER BY ti.id ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Header plus items, or `None` when the header does not exist.
    pub async fn detail(&self, id: i64) -> DbResult<Option<TransactionDetail>> {
        let Some(transaction) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items(id).await?;

        Ok(Some(TransactionDetail { transaction, items }))
    }

    /// Changes only the status column.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such transaction
    pub async fn update_status(&self, id: i64, status: TransactionStatus) -> DbResult<Transaction> {
        debug!(id, status = status.as_str(), "Updating transaction status");

        let result = sqlx::query("UPDATE transactions SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Transaction", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", id))
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn item_count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Unit-of-work operations (caller's connection)
    // -------------------------------------------------------------------------

    /// Inserts a sale header and returns its generated id.
    pub async fn insert_header(conn: &mut SqliteConnection, header: &NewTransaction<'_>) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                user_id, total_amount, payment_method, customer_name, status, transaction_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(header.user_id)
        .bind(header.total_amount)
        .bind(header.payment_method)
        .bind(header.customer_name)
        .bind(header.status)
        .bind(header.transaction_date)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts one item row priced at the line's snapshot price.
    pub async fn insert_item(
        conn: &mut SqliteConnection,
        transaction_id: i64,
        line: &PricedLine,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transaction_items (transaction_id, product_id, quantity, unit_price, subtotal)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
