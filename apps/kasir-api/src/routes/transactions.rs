//! `/transactions`: sales.
//!
//! Cashiers and admins record and read sales. Only admins change a
//! transaction's status.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::sale::SaleRequest;
use kasir_core::{Transaction, TransactionDetail};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::guard::{Admin, Staff};
use crate::routes::with_data;
use crate::services::SaleService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list).post(create))
        .route("/transactions/{id}", get(show).put(update_status))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: Option<String>,
}

async fn list(State(state): State<AppState>, _staff: Staff) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(SaleService::new(state).list().await?))
}

async fn show(
    State(state): State<AppState>,
    _staff: Staff,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TransactionDetail>> {
    Ok(Json(SaleService::new(state).detail(id).await?))
}

async fn create(
    State(state): State<AppState>,
    staff: Staff,
    ApiJson(request): ApiJson<SaleRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let receipt = SaleService::new(state).create(staff.id(), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaksi berhasil disimpan!",
            "transaction_id": receipt.transaction_id,
            "total_amount": receipt.total_amount,
        })),
    ))
}

async fn update_status(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<Value>> {
    let transaction = SaleService::new(state).update_status(id, body.status).await?;
    Ok(with_data("Status transaksi berhasil diperbarui", transaction))
}
