//! Staff account administration.

use kasir_core::validation::{validate_registration, DEACTIVATION_REQUIRED};
use kasir_core::{CoreError, Role, User, UserDraft, ValidationError};
use kasir_db::DbError;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::password::hash_password_async;
use crate::AppState;

const USER_NOT_FOUND: &str = "Pengguna tidak ditemukan.";

/// User administration service.
pub struct UserService {
    state: AppState,
}

impl UserService {
    pub fn new(state: AppState) -> Self {
        UserService { state }
    }

    /// Creates an active account. The password is hashed before storage.
    pub async fn register(&self, draft: UserDraft) -> ApiResult<User> {
        let new_user = validate_registration(draft)?;
        let password_hash = hash_password_async(new_user.password).await?;

        let user = self
            .state
            .db
            .users()
            .insert(
                &new_user.username,
                &password_hash,
                new_user.fullname.as_deref(),
                new_user.role,
            )
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => ApiError::duplicate("Username sudah digunakan."),
                other => other.into(),
            })?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Deactivates `target_id` on behalf of `caller_id`.
    ///
    /// ## Failures
    /// - target missing (or 0): 400
    /// - target is the caller: 400 `SELF_DEACTIVATION`
    /// - no such user: 404
    pub async fn deactivate(&self, caller_id: i64, target_id: Option<i64>) -> ApiResult<User> {
        let target_id = target_id
            .filter(|id| *id != 0)
            .ok_or(ValidationError::Incomplete(DEACTIVATION_REQUIRED))?;

        if target_id == caller_id {
            return Err(CoreError::SelfDeactivation.into());
        }

        let user = self
            .state
            .db
            .users()
            .deactivate(target_id)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => ApiError::not_found(USER_NOT_FOUND),
                other => other.into(),
            })?;

        info!(user_id = user.id, by = caller_id, "User deactivated");
        Ok(user)
    }

    /// The caller's own account.
    pub async fn profile(&self, user_id: i64) -> ApiResult<User> {
        self.state
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        Ok(self.state.db.users().list().await?)
    }

    /// Creates the configured bootstrap admin while no account exists yet.
    ///
    /// Returns the created account, or `None` when nothing was done.
    pub async fn ensure_bootstrap_admin(&self) -> ApiResult<Option<User>> {
        let Some((username, password)) = self.state.config.bootstrap_admin() else {
            return Ok(None);
        };

        if self.state.db.users().count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .register(UserDraft {
                username: Some(username.to_string()),
                password: Some(password.to_string()),
                fullname: Some("Administrator".to_string()),
                role: Some(Role::Admin.as_str().to_string()),
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
        Ok(Some(user))
    }
}
