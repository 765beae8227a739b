//! # Kasir API
//!
//! HTTP/JSON server for a small store's point of sale: staff login,
//! catalog management, and sales recorded against inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kasir API Services                             │
//! │                                                                         │
//! │  request ──► trace_requests (span + x-request-id) ──► CORS              │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │ Extractors: AuthUser ──► Authorized<AdminOnly|AdminOrCashier>  │    │
//! │  │             ApiJson<T>, ApiPath<T> (400 on malformed input)    │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  AuthService   │  │ CatalogService │  │  SaleService               ││
//! │  │                │  │                │  │                            ││
//! │  │ • login        │  │ • categories   │  │ • create (atomic)          ││
//! │  │ • refresh      │  │ • products     │  │ • list / detail            ││
//! │  │ • logout       │  │                │  │ • update_status            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │  ┌────────────────┐                                                    │
//! │  │  UserService   │        all services ──► kasir-db ──► SQLite        │
//! │  │ • register     │                                                    │
//! │  │ • deactivate   │                                                    │
//! │  │ • profile/list │                                                    │
//! │  └────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables use the `KASIR_` prefix:
//! - `KASIR_PORT` - HTTP port (default: 3000)
//! - `KASIR_DATABASE_PATH` - SQLite file (default: ./kasir.db)
//! - `KASIR_JWT_ACCESS_SECRET` / `KASIR_JWT_REFRESH_SECRET` - signing secrets
//! - `KASIR_JWT_ACCESS_LIFETIME_SECS` - access token lifetime (default: 900)
//! - `KASIR_JWT_REFRESH_LIFETIME_SECS` - refresh token lifetime (default: 604800)
//! - `KASIR_DB_CONNECT_TIMEOUT_SECS` - pool acquire timeout (default: 30)
//! - `KASIR_CORS_ALLOWED_ORIGINS` - comma-separated origins (default: `*`)
//! - `KASIR_BOOTSTRAP_ADMIN_USERNAME` / `KASIR_BOOTSTRAP_ADMIN_PASSWORD`

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use kasir_db::Database;

pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
///
/// Cloned into every handler; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        AppState {
            db,
            jwt: Arc::new(JwtManager::from_config(&config)),
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with CORS and request tracing applied.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .merge(routes::categories::router())
        .merge(routes::products::router())
        .merge(routes::transactions::router())
        .merge(routes::users::router())
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::trace_requests))
        .with_state(state)
}
