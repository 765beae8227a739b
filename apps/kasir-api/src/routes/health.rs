//! Liveness endpoints.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{extract::State, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

const BANNER: &str = "API Toko Online berjalan. Akses /categories, /products, atau /transactions.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}

async fn banner() -> &'static str {
    BANNER
}

/// 200 when the database answers `SELECT 1`, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok", "database": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": "unreachable" })),
        )
    }
}
