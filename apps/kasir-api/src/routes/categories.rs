//! `/categories`: admin-only category CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use kasir_core::{Category, CategoryDraft};
use serde_json::Value;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::guard::Admin;
use crate::routes::{message, with_data};
use crate::services::CatalogService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list).post(create))
        .route("/categories/{id}", get(show).put(update).delete(remove))
}

async fn list(State(state): State<AppState>, _admin: Admin) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(CatalogService::new(state).list_categories().await?))
}

async fn show(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    Ok(Json(CatalogService::new(state).get_category(id).await?))
}

async fn create(
    State(state): State<AppState>,
    _admin: Admin,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let category = CatalogService::new(state).create_category(draft).await?;
    Ok((StatusCode::CREATED, with_data("Kategori berhasil ditambahkan", category)))
}

async fn update(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> ApiResult<Json<Value>> {
    let category = CatalogService::new(state).update_category(id, draft).await?;
    Ok(with_data("Kategori berhasil diperbarui", category))
}

async fn remove(
    State(state): State<AppState>,
    _admin: Admin,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    CatalogService::new(state).delete_category(id).await?;
    Ok(message("Kategori berhasil dihapus."))
}
