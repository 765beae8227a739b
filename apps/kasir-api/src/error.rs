//! # API Error Type
//!
//! Unified error type for every HTTP handler.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir API                              │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /transactions                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::UniqueViolation ─────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Business Error? ─── CoreError::InsufficientStock ─ ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄─── 400 {"message": "Stok tidak cukup ...",                           │
//! │            "code": "INSUFFICIENT_STOCK"}                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services pick the code when the same database failure means different
//! things (a foreign key violation is a bad reference on insert but a
//! blocked delete on delete). The `From` impls below are the fallbacks.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kasir_core::{CoreError, ValidationError};
use kasir_db::DbError;
use serde::Serialize;

/// Message sent for every 500; details only go to the log.
pub const INTERNAL_MESSAGE: &str = "Terjadi kesalahan pada server.";

/// Error returned from handlers and services.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "message": "Produk tidak ditemukan.",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Human-readable error message for display
    pub message: String,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// const res = await fetch('/products', { headers });
/// if (res.status === 401) {
///   const body = await res.json();
///   if (body.code === 'TOKEN_EXPIRED') {
///     await refreshAccessToken();
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed input (400)
    ValidationError,

    /// Unknown username or wrong password (401)
    InvalidCredentials,

    /// Login attempt on a deactivated account (403)
    AccountDisabled,

    /// No bearer token, or no refresh token in the body (401)
    TokenMissing,

    /// Access token past its expiry; the client should refresh (401)
    TokenExpired,

    /// Bad signature, malformed, or unknown token (403)
    InvalidToken,

    /// Authenticated but role not permitted (403)
    Forbidden,

    /// Unique constraint violated (409)
    DuplicateKey,

    /// Referenced row does not exist (400)
    InvalidReference,

    /// Delete blocked by referencing rows (409)
    Conflict,

    /// Sale quantity exceeds stock (400)
    InsufficientStock,

    /// Resource not found (404)
    NotFound,

    /// Caller tried to deactivate themselves (400)
    SelfDeactivation,

    /// Unexpected failure (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::InvalidReference
            | ErrorCode::InsufficientStock
            | ErrorCode::SelfDeactivation => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidCredentials | ErrorCode::TokenMissing | ErrorCode::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::AccountDisabled | ErrorCode::InvalidToken | ErrorCode::Forbidden => {
                StatusCode::FORBIDDEN
            }
            ErrorCode::DuplicateKey | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidToken, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::DuplicateKey, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Logs `detail` and returns the generic 500.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal error");
        ApiError::new(ErrorCode::Internal, INTERNAL_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Fallback conversion for database errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found("Data tidak ditemukan."),
            DbError::UniqueViolation { field } => {
                tracing::debug!(%field, "Unique violation");
                ApiError::duplicate("Data sudah ada.")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::debug!(%message, "Foreign key violation");
                ApiError::new(ErrorCode::InvalidReference, "Referensi data tidak valid.")
            }
            DbError::CheckViolation { message } => {
                tracing::debug!(%message, "Check violation");
                ApiError::validation("Data tidak valid.")
            }
            other => ApiError::internal(other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::ProductNotFound(_) => ApiError::not_found(message),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, message)
            }
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, message),
            CoreError::SelfDeactivation => ApiError::new(ErrorCode::SelfDeactivation, message),
            CoreError::Validation(_) => ApiError::validation(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Result type for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::DuplicateKey.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InsufficientStock.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::SelfDeactivation.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_serialized_shape() {
        let body = serde_json::to_value(ApiError::new(ErrorCode::TokenExpired, "Token kedaluwarsa."))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "message": "Token kedaluwarsa.", "code": "TOKEN_EXPIRED" })
        );
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::InsufficientStock {
            product: "Kopi".to_string(),
            remaining: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Stok tidak cukup untuk produk Kopi. Tersisa: 5");

        let err: ApiError = CoreError::ProductNotFound(7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_hides_detail() {
        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message, INTERNAL_MESSAGE);
    }
}
