//! # Domain Types
//!
//! Core domain types shared by the database and HTTP layers.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐        │
//! │  │    User      │     │  Category    │◄────│    Product       │        │
//! │  │  id, role    │     │  id, name    │ FK  │  sku, price,     │        │
//! │  │  is_active   │     └──────────────┘     │  stock           │        │
//! │  └──────┬───────┘                          └────────▲─────────┘        │
//! │         │ operator                                  │ FK               │
//! │  ┌──────▼───────┐     ┌─────────────────────────────┴──────┐           │
//! │  │ Transaction  │◄────│ TransactionItem                    │           │
//! │  │ total_amount │ FK  │ quantity, unit_price (snapshot),   │           │
//! │  │ status       │     │ subtotal                           │           │
//! │  └──────────────┘     └────────────────────────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are store-assigned integers. Password hashes never appear
//! in these types; the database layer keeps them in its own row type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Staff role. Closed set; route guards check membership in a role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum Role {
    /// Store owner/manager: catalog, users, transaction status.
    #[serde(rename = "admin")]
    Admin,
    /// Cashier ("kasir"): records sales and reads transactions.
    #[serde(rename = "kasir")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "kasir"))]
    Cashier,
}

impl Role {
    /// Storage and wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "kasir",
        }
    }

    /// Human-facing label used in access-denied messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Cashier => "Kasir",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "kasir" => Ok(Role::Cashier),
            _ => Err(ValidationError::NotAllowed {
                field: "Role".to_string(),
                allowed: "\"admin\" atau \"kasir\"".to_string(),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff account as exposed outside the database layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: Option<String>,
    pub role: Role,
    /// Deactivated accounts can no longer log in. Accounts are never deleted.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Registration payload as received from the client.
///
/// Fields are optional so a missing field produces a validation message
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UserDraft {
    pub username: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
    pub role: Option<String>,
}

/// A validated registration. The password is still plain text here and is
/// hashed by the API layer before it reaches the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub fullname: Option<String>,
    pub role: Role,
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product with its category name joined in for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub sku: String,
    pub name: String,
    #[ts(type = "string")]
    pub price: Money,
    /// Never negative; only the sale workflow decrements it.
    pub stock: i64,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub category_id: Option<i64>,
    pub sku: Option<String>,
    pub name: Option<String>,
    #[ts(type = "string | number | null")]
    pub price: Option<Money>,
    pub stock: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category_id: i64,
    pub sku: String,
    pub name: String,
    pub price: Money,
    pub stock: i64,
    pub description: Option<String>,
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Lifecycle status of a recorded sale.
///
/// New sales are always `Completed`; an admin may later move a sale to any
/// status. Status changes never touch stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TransactionStatus {
    Completed,
    Pending,
    Canceled,
}

/// Message used whenever a status value is missing or unknown.
pub const STATUS_REQUIRED: &str =
    "Status harus diisi dan valid (\"completed\", \"canceled\", atau \"pending\").";

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Canceled => "canceled",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            "canceled" => Ok(TransactionStatus::Canceled),
            _ => Err(ValidationError::Incomplete(STATUS_REQUIRED)),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A recorded sale header with the operator's username joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: i64,
    /// The staff account that rang up the sale.
    pub user_id: i64,
    pub cashier_username: String,
    /// Always equals the sum of the item subtotals.
    #[ts(type = "string")]
    pub total_amount: Money,
    pub payment_method: String,
    pub customer_name: Option<String>,
    pub status: TransactionStatus,
    #[ts(as = "String")]
    pub transaction_date: DateTime<Utc>,
}

/// One line of a recorded sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionItem {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    pub sku: String,
    pub product_name: String,
    pub quantity: i64,
    /// Product price at the moment of sale.
    #[ts(type = "string")]
    pub unit_price: Money,
    #[ts(type = "string")]
    pub subtotal: Money,
}

/// Header plus items, as returned by `GET /transactions/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}
