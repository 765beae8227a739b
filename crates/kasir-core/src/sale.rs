//! # Sale Pricing
//!
//! The pure half of recording a sale: validating the cart payload and
//! pricing each line against the product row read inside the database
//! transaction.
//!
//! ## Flow
//! ```text
//! SaleRequest ──into_cart()──► Cart (non-empty, payment method, qty > 0)
//!                                │
//!        for each line, in input order, inside the DB transaction:
//!                                │
//!              StockSnapshot ◄── SELECT price, stock, name
//!                                │
//!                   price_line() ──► PricedLine { unit_price, subtotal,
//!                                │                remaining_stock }
//!                                ▼
//!                          cart_total() ──► Transaction.total_amount
//! ```
//!
//! Each line is checked against its own snapshot. When one product appears
//! on two lines, both lines see the stock as it was before the sale.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Message for a cart without items or without a payment method.
pub const CART_REQUIRED: &str = "Item, dan metode pembayaran wajib diisi.";

// =============================================================================
// Input
// =============================================================================

/// One requested line: which product and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// `POST /transactions` body.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct SaleRequest {
    pub items: Option<Vec<SaleLine>>,
    pub payment_method: Option<String>,
    pub customer_name: Option<String>,
}

/// A cart that passed payload validation and may open a database transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<SaleLine>,
    pub payment_method: String,
    pub customer_name: Option<String>,
}

impl SaleRequest {
    /// Validates the payload without touching the store.
    ///
    /// ## Rules
    /// - `items` present and non-empty
    /// - `payment_method` present and not blank
    /// - every quantity strictly positive
    pub fn into_cart(self) -> Result<Cart, ValidationError> {
        let lines = match self.items {
            Some(items) if !items.is_empty() => items,
            _ => return Err(ValidationError::Incomplete(CART_REQUIRED)),
        };

        let payment_method = match self.payment_method {
            Some(pm) if !pm.trim().is_empty() => pm.trim().to_string(),
            _ => return Err(ValidationError::Incomplete(CART_REQUIRED)),
        };

        if lines.iter().any(|line| line.quantity <= 0) {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        let customer_name = self
            .customer_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Cart {
            lines,
            payment_method,
            customer_name,
        })
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Product state as read inside the sale's database transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockSnapshot {
    pub product_id: i64,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

/// A line priced at the snapshot price, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    /// Snapshot stock minus this line's quantity; written back as the new stock.
    pub remaining_stock: i64,
}

/// Prices one line against its snapshot.
///
/// ## Errors
/// - `InsufficientStock` when the quantity exceeds the snapshot stock
/// - `Validation` when the subtotal overflows
pub fn price_line(line: &SaleLine, snapshot: &StockSnapshot) -> CoreResult<PricedLine> {
    if line.quantity > snapshot.stock {
        return Err(CoreError::InsufficientStock {
            product: snapshot.name.clone(),
            remaining: snapshot.stock,
        });
    }

    let subtotal = snapshot
        .price
        .checked_times(line.quantity)
        .ok_or_else(|| ValidationError::invalid("quantity", "subtotal terlalu besar"))?;

    Ok(PricedLine {
        product_id: line.product_id,
        quantity: line.quantity,
        unit_price: snapshot.price,
        subtotal,
        remaining_stock: snapshot.stock - line.quantity,
    })
}

/// Sums line subtotals into the transaction total.
pub fn cart_total(lines: &[PricedLine]) -> CoreResult<Money> {
    lines.iter().try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line.subtotal)
            .ok_or_else(|| ValidationError::invalid("total_amount", "total terlalu besar").into())
    })
}

/// What a committed sale reports back to the cashier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct SaleReceipt {
    pub transaction_id: i64,
    #[ts(type = "string")]
    pub total_amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(stock: i64, price_minor: i64) -> StockSnapshot {
        StockSnapshot {
            product_id: 1,
            name: "Kopi Susu".to_string(),
            price: Money::from_minor(price_minor),
            stock,
        }
    }

    fn request(items: Option<Vec<SaleLine>>, payment: Option<&str>) -> SaleRequest {
        SaleRequest {
            items,
            payment_method: payment.map(str::to_string),
            customer_name: None,
        }
    }

    #[test]
    fn test_into_cart_requires_items_and_payment_method() {
        let line = SaleLine { product_id: 1, quantity: 1 };

        assert_eq!(
            request(None, Some("cash")).into_cart(),
            Err(ValidationError::Incomplete(CART_REQUIRED))
        );
        assert_eq!(
            request(Some(vec![]), Some("cash")).into_cart(),
            Err(ValidationError::Incomplete(CART_REQUIRED))
        );
        assert_eq!(
            request(Some(vec![line]), Some("  ")).into_cart(),
            Err(ValidationError::Incomplete(CART_REQUIRED))
        );
        assert!(request(Some(vec![line]), Some("cash")).into_cart().is_ok());
    }

    #[test]
    fn test_into_cart_rejects_non_positive_quantity() {
        let lines = vec![
            SaleLine { product_id: 1, quantity: 2 },
            SaleLine { product_id: 2, quantity: 0 },
        ];
        assert!(matches!(
            request(Some(lines), Some("cash")).into_cart(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_price_line_snapshots_price_and_stock() {
        let line = SaleLine { product_id: 1, quantity: 3 };
        let priced = price_line(&line, &snapshot(5, 1_500_000)).unwrap();

        assert_eq!(priced.unit_price, Money::from_minor(1_500_000));
        assert_eq!(priced.subtotal, Money::from_minor(4_500_000));
        assert_eq!(priced.remaining_stock, 2);
    }

    #[test]
    fn test_price_line_allows_selling_entire_stock() {
        let line = SaleLine { product_id: 1, quantity: 5 };
        assert_eq!(price_line(&line, &snapshot(5, 100)).unwrap().remaining_stock, 0);
    }

    #[test]
    fn test_price_line_over_stock_names_product() {
        let line = SaleLine { product_id: 1, quantity: 1000 };
        let err = price_line(&line, &snapshot(5, 100)).unwrap_err();
        assert_eq!(err.to_string(), "Stok tidak cukup untuk produk Kopi Susu. Tersisa: 5");
    }

    #[test]
    fn test_cart_total_is_sum_of_subtotals() {
        let a = price_line(&SaleLine { product_id: 1, quantity: 2 }, &snapshot(10, 1250)).unwrap();
        let b = price_line(&SaleLine { product_id: 1, quantity: 1 }, &snapshot(10, 99)).unwrap();
        assert_eq!(cart_total(&[a, b]).unwrap(), Money::from_minor(2599));
    }
}
