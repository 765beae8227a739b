//! # Repository Module
//!
//! One repository per table group. Each holds a pool clone and is created
//! on demand through [`Database`](crate::Database) accessors.
//!
//! ```text
//! db.products().list()                     ──► pooled connection
//! ProductRepository::snapshot(&mut tx, id) ──► caller's reserved connection
//! ```
//!
//! Methods taking `&mut SqliteConnection` are the ones the sale workflow
//! runs inside its own database transaction.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`] - Staff accounts
//! - [`RefreshTokenRepository`] - Stored refresh tokens
//! - [`CategoryRepository`] - Category CRUD
//! - [`ProductRepository`] - Product CRUD, stock snapshot/update
//! - [`TransactionRepository`] - Sale headers and items

pub mod category;
pub mod product;
pub mod refresh_token;
pub mod transaction;
pub mod user;

pub use category::CategoryRepository;
pub use product::ProductRepository;
pub use refresh_token::{RefreshTokenRecord, RefreshTokenRepository};
pub use transaction::{NewTransaction, TransactionRepository};
pub use user::{UserRecord, UserRepository};
