//! Staff accounts: `/profile`, `/users`, `/register`, `/deactivate-user`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use kasir_core::{User, UserDraft};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::guard::{Admin, Staff};
use crate::routes::with_data;
use crate::services::UserService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/users", get(list))
        .route("/register", post(register))
        .route("/deactivate-user", put(deactivate))
}

#[derive(Debug, Deserialize)]
struct DeactivateBody {
    id: Option<i64>,
}

async fn profile(State(state): State<AppState>, staff: Staff) -> ApiResult<Json<User>> {
    Ok(Json(UserService::new(state).profile(staff.id()).await?))
}

async fn list(State(state): State<AppState>, _admin: Admin) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(UserService::new(state).list().await?))
}

async fn register(
    State(state): State<AppState>,
    _admin: Admin,
    ApiJson(draft): ApiJson<UserDraft>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = UserService::new(state).register(draft).await?;
    Ok((StatusCode::CREATED, with_data("Pengguna berhasil didaftarkan.", user)))
}

async fn deactivate(
    State(state): State<AppState>,
    admin: Admin,
    ApiJson(body): ApiJson<DeactivateBody>,
) -> ApiResult<Json<Value>> {
    let user = UserService::new(state).deactivate(admin.id(), body.id).await?;
    let message = format!("Pengguna {} berhasil dinonaktifkan.", user.username);
    Ok(with_data(message, user))
}
