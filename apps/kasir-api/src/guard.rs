//! # Access Control Guard
//!
//! Bearer-token authentication and role gates, expressed as extractors.
//!
//! ```text
//! Authorization header
//!      │
//!      ├── absent / not "Bearer <t>" ──► 401 TOKEN_MISSING
//!      │
//!      ▼
//! verify access token
//!      │
//!      ├── expired ────────────────────► 401 TOKEN_EXPIRED  (client refreshes)
//!      ├── bad signature / malformed ──► 403 INVALID_TOKEN
//!      │
//!      ▼
//! AuthUser { id, username, role }
//!      │
//!      ▼
//! Authorized<P>: role ∈ P::ALLOWED ? ──► no: 403 FORBIDDEN
//! ```
//!
//! A handler takes `AuthUser` when any logged-in account may call it, or
//! `Admin` / `Staff` to also require a role. The role gate reuses the
//! identity already verified for the request.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use kasir_core::{require_role, Role, ADMIN_ONLY, ADMIN_OR_CASHIER};
use tracing::debug;

use crate::auth::{extract_bearer_token, TokenError};
use crate::error::{ApiError, ErrorCode};
use crate::AppState;

/// Identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| {
                ApiError::new(ErrorCode::TokenMissing, "Akses ditolak. Token tidak tersedia.")
            })?;

        let claims = state.jwt.verify_access(token).map_err(|e| match e {
            TokenError::Expired => ApiError::new(ErrorCode::TokenExpired, "Token kedaluwarsa."),
            other => {
                debug!(error = %other, "Rejected access token");
                ApiError::invalid_token("Token tidak valid.")
            }
        })?;

        let user = AuthUser {
            id: claims.id,
            username: claims.username,
            role: claims.role,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// A closed set of roles a route accepts.
pub trait Policy {
    const ALLOWED: &'static [Role];
}

pub struct AdminOnly;

impl Policy for AdminOnly {
    const ALLOWED: &'static [Role] = ADMIN_ONLY;
}

pub struct AdminOrCashier;

impl Policy for AdminOrCashier {
    const ALLOWED: &'static [Role] = ADMIN_OR_CASHIER;
}

/// An [`AuthUser`] whose role passed policy `P`.
#[derive(Debug, Clone)]
pub struct Authorized<P> {
    pub user: AuthUser,
    _policy: PhantomData<fn() -> P>,
}

impl<P> Authorized<P> {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

impl<P: Policy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(user.role, P::ALLOWED)?;

        Ok(Authorized {
            user,
            _policy: PhantomData,
        })
    }
}

/// Admin-only routes.
pub type Admin = Authorized<AdminOnly>;

/// Routes open to admins and cashiers.
pub type Staff = Authorized<AdminOrCashier>;
