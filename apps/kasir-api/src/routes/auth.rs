//! `/auth/*`: login, refresh, logout.

use axum::extract::State;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::guard::AuthUser;
use crate::routes::message;
use crate::services::AuthService;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", delete(logout))
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshBody {
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

async fn login(State(state): State<AppState>, ApiJson(body): ApiJson<LoginBody>) -> ApiResult<Json<Value>> {
    let tokens = AuthService::new(state).login(body.username, body.password).await?;

    Ok(Json(json!({
        "message": "Login berhasil",
        "accessToken": tokens.access_token,
        "refreshToken": tokens.refresh_token,
    })))
}

async fn refresh(State(state): State<AppState>, ApiJson(body): ApiJson<RefreshBody>) -> ApiResult<Json<Value>> {
    let access_token = AuthService::new(state).refresh(body.refresh_token).await?;

    Ok(Json(json!({
        "message": "Token berhasil diperbarui",
        "accessToken": access_token,
    })))
}

async fn logout(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    AuthService::new(state).logout(user.id).await?;
    Ok(message("Logout berhasil."))
}
