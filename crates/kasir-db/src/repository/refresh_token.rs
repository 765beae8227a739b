//! Refresh token storage.
//!
//! A user has at most one stored token: login replaces it, logout deletes it.
//! Expired rows are left in place and ignored by the expiry check.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// True once `now` has reached the stored expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Repository for the `user_refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: SqlitePool,
}

impl RefreshTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RefreshTokenRepository { pool }
    }

    /// Deletes every token for the user and stores `token` in its place.
    ///
    /// Both statements run in one database transaction, so the user never
    /// ends up with zero or two rows from this call.
    pub async fn replace_for_user(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(user_id, %expires_at, "Replacing refresh token");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM user_refresh_tokens WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO user_refresh_tokens (user_id, token, expires_at) VALUES (?1, ?2, ?3)",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Finds a stored token by its exact string. Expiry is not checked here.
    pub async fn find(&self, token: &str) -> DbResult<Option<RefreshTokenRecord>> {
        let record = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, token, expires_at FROM user_refresh_tokens WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes every token for the user. Returns how many rows went away.
    pub async fn delete_for_user(&self, user_id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM user_refresh_tokens WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(user_id, deleted = result.rows_affected(), "Deleted refresh tokens");
        Ok(result.rows_affected())
    }

    pub async fn count_for_user(&self, user_id: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_refresh_tokens WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
