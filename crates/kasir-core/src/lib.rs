//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! Everything the store backend decides without touching a database,
//! a socket or a clock it does not own.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kasir-api (axum)                             │   │
//! │  │   /auth  /categories  /products  /transactions  /users          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   sale    │  │  access   │  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleLine  │  │   Role    │  │   │
//! │  │   │  Category │  │           │  │ PricedLine│  │ role sets │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Category, Product, Transaction, ...)
//! - [`money`] - Fixed-point money with two decimal places
//! - [`sale`] - Cart validation and per-line pricing against a stock snapshot
//! - [`access`] - Role sets used by the access-control guard
//! - [`validation`] - Input validation for catalog and user payloads
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::money::Money;
//! use kasir_core::sale::{price_line, SaleLine, StockSnapshot};
//!
//! let snapshot = StockSnapshot {
//!     product_id: 1,
//!     name: "Kopi Susu".to_string(),
//!     price: Money::from_minor(1_500_000), // 15000.00
//!     stock: 5,
//! };
//!
//! let line = price_line(&SaleLine { product_id: 1, quantity: 2 }, &snapshot).unwrap();
//! assert_eq!(line.subtotal, Money::from_minor(3_000_000));
//! assert_eq!(line.remaining_stock, 3);
//! ```

pub mod access;
pub mod error;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{require_role, ADMIN_ONLY, ADMIN_OR_CASHIER};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 50;

