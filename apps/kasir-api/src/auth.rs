//! JWT authentication module.
//!
//! Handles access/refresh token generation and validation. Access and
//! refresh tokens are signed with different secrets and carry a
//! `token_type` claim, so neither can stand in for the other.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kasir_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ApiConfig;

/// Which secret a token is signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,

    pub username: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID, unique per token even within the same second
    pub jti: String,

    pub token_type: TokenType,
}

impl Claims {
    /// Expiry as a timestamp, for storing alongside a refresh token.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature is fine but `exp` has passed.
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed, or wrong token type.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// A freshly signed token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// JWT token manager.
pub struct JwtManager {
    access_secret: String,
    refresh_secret: String,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(
        access_secret: String,
        refresh_secret: String,
        access_lifetime_secs: i64,
        refresh_lifetime_secs: i64,
    ) -> Self {
        JwtManager {
            access_secret,
            refresh_secret,
            access_lifetime_secs,
            refresh_lifetime_secs,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        JwtManager::new(
            config.jwt_access_secret.clone(),
            config.jwt_refresh_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        )
    }

    /// Generate an access token.
    pub fn issue_access(&self, id: i64, username: &str, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue(id, username, role, TokenType::Access)
    }

    /// Generate a refresh token.
    pub fn issue_refresh(&self, id: i64, username: &str, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue(id, username, role, TokenType::Refresh)
    }

    /// Validate an access token.
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    /// Validate a refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    fn issue(&self, id: i64, username: &str, role: Role, token_type: TokenType) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime(token_type));

        let claims = Claims {
            id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret(claims.token_type)),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(expected)),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })?;

        if data.claims.token_type != expected {
            return Err(TokenError::Invalid("unexpected token type".to_string()));
        }

        Ok(data.claims)
    }

    fn secret(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Access => self.access_secret.as_bytes(),
            TokenType::Refresh => self.refresh_secret.as_bytes(),
        }
    }

    fn lifetime(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Access => self.access_lifetime_secs,
            TokenType::Refresh => self.refresh_lifetime_secs,
        }
    }
}

/// Extract bearer token from an `Authorization` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
