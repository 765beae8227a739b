//! # Sale Transaction Service
//!
//! Records a cart as one atomic unit of work.
//!
//! ```text
//! SaleRequest ──► into_cart()            400 on empty cart / no payment method
//!      │
//!      ▼
//! BEGIN (one reserved connection)
//!      │
//!      ├── for each line, in input order:
//!      │      snapshot(product_id)       404 unknown product
//!      │      price_line(line, snapshot) 400 quantity > stock
//!      │
//!      ├── insert header (status = completed)
//!      ├── for each priced line:
//!      │      insert item at snapshot price
//!      │      set stock = snapshot stock - quantity
//!      │
//!      ├── Ok  ──► COMMIT
//!      └── Err ──► ROLLBACK, then return the error
//! ```
//!
//! Every line reads its own snapshot before any write, so a product that
//! appears twice in one cart is checked against its pre-sale stock both
//! times and ends at `stock - quantity_of_last_line`.
//!
//! SQLite runs one writer at a time. When two sales race for the same
//! product, the one whose snapshot went stale fails with a busy error
//! when it tries to write; it never overwrites the other's stock update.

use chrono::Utc;
use kasir_core::sale::{cart_total, price_line, Cart, SaleReceipt, SaleRequest};
use kasir_core::{
    CoreError, Transaction, TransactionDetail, TransactionStatus, ValidationError, STATUS_REQUIRED,
};
use kasir_db::{DbError, NewTransaction, ProductRepository, TransactionRepository};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const TRANSACTION_NOT_FOUND: &str = "Transaksi tidak ditemukan.";
const SAVE_FAILED: &str = "Terjadi kesalahan pada saat menyimpan transaksi.";

/// Sale transaction service.
pub struct SaleService {
    state: AppState,
}

impl SaleService {
    pub fn new(state: AppState) -> Self {
        SaleService { state }
    }

    /// Validates and commits a sale for `cashier_id`.
    ///
    /// Nothing is persisted unless every line is valid: no header, no
    /// items, no stock change.
    pub async fn create(&self, cashier_id: i64, request: SaleRequest) -> ApiResult<SaleReceipt> {
        let cart = request.into_cart()?;

        let mut tx = self.state.db.begin().await.map_err(save_failed)?;

        match record_sale(&mut tx, cashier_id, &cart).await {
            Ok(receipt) => {
                tx.commit()
                    .await
                    .map_err(|e| save_failed(DbError::TransactionFailed(e.to_string())))?;

                info!(
                    transaction_id = receipt.transaction_id,
                    cashier_id,
                    lines = cart.lines.len(),
                    total = %receipt.total_amount,
                    "Sale recorded"
                );
                Ok(receipt)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                warn!(cashier_id, code = ?err.code, message = %err.message, "Sale rejected");
                Err(err)
            }
        }
    }

    /// All sales, newest first.
    pub async fn list(&self) -> ApiResult<Vec<Transaction>> {
        Ok(self.state.db.transactions().list().await?)
    }

    /// One sale with its items.
    pub async fn detail(&self, id: i64) -> ApiResult<TransactionDetail> {
        self.state
            .db
            .transactions()
            .detail(id)
            .await?
            .ok_or_else(|| ApiError::not_found(TRANSACTION_NOT_FOUND))
    }

    /// Sets the status of a recorded sale. Stock is left as is.
    pub async fn update_status(&self, id: i64, status: Option<String>) -> ApiResult<Transaction> {
        let status: TransactionStatus = status
            .ok_or(ValidationError::Incomplete(STATUS_REQUIRED))?
            .parse()?;

        let updated = self
            .state
            .db
            .transactions()
            .update_status(id, status)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => ApiError::not_found(TRANSACTION_NOT_FOUND),
                other => other.into(),
            })?;

        info!(transaction_id = id, status = status.as_str(), "Transaction status updated");
        Ok(updated)
    }
}

/// Prices every line, writes the header and items, and decrements stock,
/// all on the caller's open transaction.
async fn record_sale(conn: &mut SqliteConnection, cashier_id: i64, cart: &Cart) -> ApiResult<SaleReceipt> {
    let mut priced = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        let snapshot = ProductRepository::snapshot(conn, line.product_id)
            .await
            .map_err(save_failed)?
            .ok_or(CoreError::ProductNotFound(line.product_id))?;

        priced.push(price_line(line, &snapshot)?);
    }

    let total_amount = cart_total(&priced)?;

    let transaction_id = TransactionRepository::insert_header(
        conn,
        &NewTransaction {
            user_id: cashier_id,
            total_amount,
            payment_method: &cart.payment_method,
            customer_name: cart.customer_name.as_deref(),
            status: TransactionStatus::Completed,
            transaction_date: Utc::now(),
        },
    )
    .await
    .map_err(save_failed)?;

    for line in &priced {
        TransactionRepository::insert_item(conn, transaction_id, line)
            .await
            .map_err(save_failed)?;
        ProductRepository::set_stock(conn, line.product_id, line.remaining_stock)
            .await
            .map_err(save_failed)?;
    }

    Ok(SaleReceipt {
        transaction_id,
        total_amount,
    })
}

/// Database failures inside a sale surface as one generic 500.
fn save_failed(err: DbError) -> ApiError {
    ApiError {
        message: SAVE_FAILED.to_string(),
        ..ApiError::internal(err)
    }
}
