//! `/products`: admin-only product CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::{Product, ProductDraft};
use serde_json::Value;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::guard::Admin;
use crate::routes::{message, with_data};
use crate::services::CatalogService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list).post(create))
        .route("/products/{id}", get(show).put(update).delete(remove))
}

async fn list(State(state): State<AppState>, _admin: Admin) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(CatalogService::new(state).list_products().await?))
}

async fn show(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(CatalogService::new(state).get_product(id).await?))
}

async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let product = CatalogService::new(state).create_product(draft).await?;
    Ok((StatusCode::CREATED, with_data("Produk berhasil ditambahkan", product)))
}

async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> ApiResult<Json<Value>> {
    let product = CatalogService::new(state).update_product(id, draft).await?;
    Ok(with_data("Produk berhasil diperbarui", product))
}

async fn remove(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    CatalogService::new(state).delete_product(id).await?;
    Ok(message("Produk berhasil dihapus."))
}
