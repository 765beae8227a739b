//! # HTTP Routes
//!
//! One module per resource group. Each exposes `router()` with full paths so
//! [`build_router`](crate::build_router) only merges them.
//!
//! ```text
//! GET    /                     banner              public
//! GET    /health               database ping       public
//! POST   /auth/login                               public
//! POST   /auth/refresh                             public
//! DELETE /auth/logout                              any logged-in user
//! *      /categories[/{id}]                        admin
//! *      /products[/{id}]                          admin
//! GET    /transactions[/{id}]                      admin, kasir
//! POST   /transactions                             admin, kasir
//! PUT    /transactions/{id}    status              admin
//! GET    /profile                                  admin, kasir
//! GET    /users                                    admin
//! POST   /register                                 admin
//! PUT    /deactivate-user                          admin
//! ```
//!
//! Reads return the resource as-is; writes wrap it as `{message, data}`.

pub mod auth;
pub mod categories;
pub mod health;
pub mod products;
pub mod transactions;
pub mod users;

use serde::Serialize;
use serde_json::{json, Value};

/// The `{message, data}` envelope used by every mutating route.
pub(crate) fn with_data(message: impl Into<String>, data: impl Serialize) -> axum::Json<Value> {
    axum::Json(json!({
        "message": message.into(),
        "data": data,
    }))
}

/// A bare `{message}` body.
pub(crate) fn message(message: impl Into<String>) -> axum::Json<Value> {
    axum::Json(json!({ "message": message.into() }))
}
