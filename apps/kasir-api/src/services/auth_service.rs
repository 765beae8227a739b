//! Login, token refresh and logout.
//!
//! One refresh token per user: login replaces whatever was stored, logout
//! deletes it. Refresh checks the stored row first, then the signature,
//! and only ever hands out a new access token.

use chrono::Utc;
use kasir_core::validation::validate_credentials;
use tracing::{info, warn};

use crate::auth::TokenError;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::password::verify_password_async;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Username atau password salah.";
const ACCOUNT_DISABLED: &str = "Akun ini telah dinonaktifkan.";

/// Tokens returned from a successful login.
#[derive(Debug, Clone)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication service.
pub struct AuthService {
    state: AppState,
}

impl AuthService {
    pub fn new(state: AppState) -> Self {
        AuthService { state }
    }

    /// Exchanges credentials for an access/refresh token pair.
    ///
    /// ## Failures
    /// - missing username or password: 400
    /// - unknown username or wrong password: 401 `INVALID_CREDENTIALS`
    /// - deactivated account: 403 `ACCOUNT_DISABLED`, even with the right password
    pub async fn login(&self, username: Option<String>, password: Option<String>) -> ApiResult<LoginTokens> {
        let (username, password) = validate_credentials(username, password)?;

        let Some(record) = self.state.db.users().find_by_username(&username).await? else {
            warn!(%username, "Login rejected: unknown username");
            return Err(ApiError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS));
        };

        if !record.is_active {
            warn!(user_id = record.id, "Login rejected: account disabled");
            return Err(ApiError::new(ErrorCode::AccountDisabled, ACCOUNT_DISABLED));
        }

        if !verify_password_async(password, record.password_hash.clone()).await? {
            warn!(user_id = record.id, "Login rejected: wrong password");
            return Err(ApiError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS));
        }

        let jwt = &self.state.jwt;
        let access = jwt
            .issue_access(record.id, &record.username, record.role)
            .map_err(ApiError::internal)?;
        let refresh = jwt
            .issue_refresh(record.id, &record.username, record.role)
            .map_err(ApiError::internal)?;
        let expires_at = refresh
            .claims
            .expires_at()
            .ok_or_else(|| ApiError::internal("refresh token expiry out of range"))?;

        self.state
            .db
            .refresh_tokens()
            .replace_for_user(record.id, &refresh.token, expires_at)
            .await?;

        info!(user_id = record.id, role = %record.role, "Login succeeded");

        Ok(LoginTokens {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    /// Issues a new access token for a stored, unexpired refresh token whose
    /// owner is still active. The refresh token itself is not rotated.
    pub async fn refresh(&self, refresh_token: Option<String>) -> ApiResult<String> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::new(ErrorCode::TokenMissing, "Refresh token diperlukan."))?;

        let stored = self.state.db.refresh_tokens().find(&token).await?;
        let record = match stored {
            Some(record) if !record.is_expired_at(Utc::now()) => record,
            _ => {
                return Err(ApiError::invalid_token(
                    "Refresh token tidak valid atau sudah kadaluwarsa.",
                ))
            }
        };

        let claims = self
            .state
            .jwt
            .verify_refresh(&token)
            .map_err(|e: TokenError| {
                warn!(user_id = record.user_id, error = %e, "Stored refresh token failed verification");
                ApiError::invalid_token("Refresh token gagal diverifikasi.")
            })?;

        if claims.id != record.user_id {
            warn!(user_id = record.user_id, claimed = claims.id, "Refresh token owner mismatch");
            return Err(ApiError::invalid_token("Refresh token gagal diverifikasi."));
        }

        match self.state.db.users().get_by_id(claims.id).await? {
            Some(user) if user.is_active => {}
            Some(_) => {
                warn!(user_id = claims.id, "Refresh rejected: account disabled");
                return Err(ApiError::new(ErrorCode::AccountDisabled, ACCOUNT_DISABLED));
            }
            None => return Err(ApiError::invalid_token("Refresh token gagal diverifikasi.")),
        }

        let access = self
            .state
            .jwt
            .issue_access(claims.id, &claims.username, claims.role)
            .map_err(ApiError::internal)?;

        info!(user_id = claims.id, "Access token refreshed");
        Ok(access.token)
    }

    /// Deletes the caller's stored refresh tokens. Idempotent.
    pub async fn logout(&self, user_id: i64) -> ApiResult<()> {
        let deleted = self.state.db.refresh_tokens().delete_for_user(user_id).await?;
        info!(user_id, deleted, "Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use kasir_core::Role;

    #[tokio::test]
    async fn test_login_keeps_one_refresh_row() {
        let state = test_support::state().await;
        let admin = test_support::user(&state, "admin", "passwordadmin", Role::Admin).await;
        let service = AuthService::new(state.clone());

        let first = service
            .login(Some("admin".into()), Some("passwordadmin".into()))
            .await
            .unwrap();
        let second = service
            .login(Some("admin".into()), Some("passwordadmin".into()))
            .await
            .unwrap();

        let tokens = state.db.refresh_tokens();
        assert_eq!(tokens.count_for_user(admin.id).await.unwrap(), 1);
        assert!(tokens.find(&first.refresh_token).await.unwrap().is_none());
        assert!(tokens.find(&second.refresh_token).await.unwrap().is_some());

        let claims = state.jwt.verify_access(&second.access_token).unwrap();
        assert_eq!(claims.id, admin.id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let state = test_support::state().await;
        test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        let service = AuthService::new(state);

        let err = service.login(Some("kasir1".into()), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = service
            .login(Some("kasir1".into()), Some("salah".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let err = service
            .login(Some("nobody".into()), Some("rahasia".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_deactivated_account_cannot_login() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        state.db.users().deactivate(user.id).await.unwrap();

        let err = AuthService::new(state.clone())
            .login(Some("kasir1".into()), Some("rahasia".into()))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AccountDisabled);
        assert_eq!(state.db.refresh_tokens().count_for_user(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_refresh() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        let service = AuthService::new(state.clone());
        let tokens = service
            .login(Some("kasir1".into()), Some("rahasia".into()))
            .await
            .unwrap();

        let access = service.refresh(Some(tokens.refresh_token.clone())).await.unwrap();
        assert_eq!(state.jwt.verify_access(&access).unwrap().id, user.id);

        let err = service.refresh(None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenMissing);

        let err = service.refresh(Some("unknown".into())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);

        // an access token is never stored, so it is rejected as unknown
        let err = service.refresh(Some(tokens.access_token)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[tokio::test]
    async fn test_refresh_with_expired_row_fails() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        let issued = state.jwt.issue_refresh(user.id, "kasir1", Role::Cashier).unwrap();
        state
            .db
            .refresh_tokens()
            .replace_for_user(user.id, &issued.token, Utc::now() - chrono::Duration::seconds(1))
            .await
            .unwrap();

        let err = AuthService::new(state).refresh(Some(issued.token)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
        assert_eq!(err.message, "Refresh token tidak valid atau sudah kadaluwarsa.");
    }

    #[tokio::test]
    async fn test_refresh_after_logout_fails() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        let service = AuthService::new(state);
        let tokens = service
            .login(Some("kasir1".into()), Some("rahasia".into()))
            .await
            .unwrap();

        service.logout(user.id).await.unwrap();
        service.logout(user.id).await.unwrap();

        let err = service.refresh(Some(tokens.refresh_token)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[tokio::test]
    async fn test_deactivation_ends_refresh() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        let service = AuthService::new(state.clone());
        let tokens = service
            .login(Some("kasir1".into()), Some("rahasia".into()))
            .await
            .unwrap();

        state.db.users().deactivate(user.id).await.unwrap();

        let err = service.refresh(Some(tokens.refresh_token)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
        assert_eq!(state.db.refresh_tokens().count_for_user(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_refresh_rejects_inactive_owner() {
        let state = test_support::state().await;
        let user = test_support::user(&state, "kasir1", "rahasia", Role::Cashier).await;
        state.db.users().deactivate(user.id).await.unwrap();

        // a row stored after deactivation still must not yield an access token
        let issued = state.jwt.issue_refresh(user.id, "kasir1", Role::Cashier).unwrap();
        state
            .db
            .refresh_tokens()
            .replace_for_user(user.id, &issued.token, issued.claims.expires_at().unwrap())
            .await
            .unwrap();

        let err = AuthService::new(state).refresh(Some(issued.token)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
        assert_eq!(err.message, ACCOUNT_DISABLED);
    }
}
