//! API server configuration.
//!
//! Sources are layered, later ones winning:
//!
//! ```text
//! built-in defaults  ──►  kasir.toml (optional)  ──►  KASIR_* environment
//! ```
//!
//! e.g. `KASIR_PORT=8080`, `KASIR_JWT_ACCESS_SECRET=...`.

use axum::http::HeaderValue;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

/// Secrets used when nothing else is configured. Startup logs a warning
/// whenever either of these is still in effect.
pub const DEV_ACCESS_SECRET: &str = "kasir-dev-access-secret-change-in-production";
pub const DEV_REFRESH_SECRET: &str = "kasir-dev-refresh-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound of the connection pool
    pub db_max_connections: u32,

    /// How long a request waits for a pooled connection, in seconds
    pub db_connect_timeout_secs: u64,

    /// Browser origins allowed by CORS; `"*"` allows any origin
    pub cors_allowed_origins: Vec<String>,

    /// HMAC secret for access tokens
    pub jwt_access_secret: String,

    /// HMAC secret for refresh tokens, distinct from the access secret
    pub jwt_refresh_secret: String,

    /// Access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,

    /// Refresh token lifetime in seconds
    pub jwt_refresh_lifetime_secs: i64,

    /// First admin, created only while the users table is empty
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

impl ApiConfig {
    /// Load configuration from defaults, `kasir.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("kasir").required(false))
            .add_source(
                Environment::with_prefix("KASIR")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            );

        Self::from_builder(builder)
    }

    /// Built-in defaults, with no file or environment layered on top.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("port", 3000)?
            .set_default("database_path", "./kasir.db")?
            .set_default("db_max_connections", 5)?
            .set_default("db_connect_timeout_secs", 30)?
            .set_default("cors_allowed_origins", vec!["*"])?
            .set_default("jwt_access_secret", DEV_ACCESS_SECRET)?
            .set_default("jwt_refresh_secret", DEV_REFRESH_SECRET)?
            .set_default("jwt_access_lifetime_secs", 900)? // 15 minutes
            .set_default("jwt_refresh_lifetime_secs", 604_800)?) // 7 days
    }

    /// Builds and validates a configuration from prepared sources.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ApiConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field rules that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_access_secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt_access_secret".to_string()));
        }
        if self.jwt_refresh_secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt_refresh_secret".to_string()));
        }
        if self.jwt_access_secret == self.jwt_refresh_secret {
            return Err(ConfigError::InvalidValue(
                "jwt_refresh_secret must differ from jwt_access_secret".to_string(),
            ));
        }
        if self.jwt_access_lifetime_secs <= 0 || self.jwt_refresh_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "token lifetimes must be positive".to_string(),
            ));
        }
        if self.jwt_access_lifetime_secs >= self.jwt_refresh_lifetime_secs {
            return Err(ConfigError::InvalidValue(
                "jwt_access_lifetime_secs must be shorter than jwt_refresh_lifetime_secs".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("db_max_connections".to_string()));
        }
        if self.db_connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("db_connect_timeout_secs".to_string()));
        }
        if self.cors_allowed_origins.is_empty() {
            return Err(ConfigError::InvalidValue("cors_allowed_origins".to_string()));
        }
        for origin in &self.cors_allowed_origins {
            let valid = origin == "*"
                || ((origin.starts_with("http://") || origin.starts_with("https://"))
                    && HeaderValue::from_str(origin).is_ok());
            if !valid {
                return Err(ConfigError::InvalidValue(format!("cors_allowed_origins: {origin}")));
            }
        }
        if self.bootstrap_admin_username.is_some() != self.bootstrap_admin_password.is_some() {
            return Err(ConfigError::InvalidValue(
                "bootstrap_admin_username and bootstrap_admin_password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// True while either signing secret is still a built-in development value.
    pub fn uses_dev_secrets(&self) -> bool {
        self.jwt_access_secret == DEV_ACCESS_SECRET || self.jwt_refresh_secret == DEV_REFRESH_SECRET
    }

    /// Bootstrap credentials, when both are configured.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.bootstrap_admin_username, &self.bootstrap_admin_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<ApiConfig, ConfigError> {
        ApiConfig::from_builder(
            ApiConfig::defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_access_lifetime_secs, 900);
        assert_eq!(config.jwt_refresh_lifetime_secs, 604_800);
        assert!(config.uses_dev_secrets());
        assert!(config.bootstrap_admin().is_none());
        assert_eq!(config.db_connect_timeout_secs, 30);
        assert_eq!(config.cors_allowed_origins, vec!["*"]);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_toml(
            r#"
            port = 8080
            jwt_access_secret = "a"
            jwt_refresh_secret = "b"
            bootstrap_admin_username = "admin"
            bootstrap_admin_password = "passwordadmin"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(!config.uses_dev_secrets());
        assert_eq!(config.bootstrap_admin(), Some(("admin", "passwordadmin")));
    }

    #[test]
    fn test_rejects_shared_secret() {
        let err = from_toml(
            r#"
            jwt_access_secret = "same"
            jwt_refresh_secret = "same"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_rejects_access_outliving_refresh() {
        let err = from_toml(
            r#"
            jwt_access_lifetime_secs = 3600
            jwt_refresh_lifetime_secs = 60
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_rejects_empty_secret() {
        let err = from_toml(r#"jwt_access_secret = """#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_rejects_half_bootstrap() {
        let err = from_toml(r#"bootstrap_admin_username = "admin""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_cors_origins() {
        let config = from_toml(
            r#"cors_allowed_origins = ["http://localhost:5173", "https://kasir.example.com"]"#,
        )
        .unwrap();
        assert_eq!(config.cors_allowed_origins.len(), 2);

        let err = from_toml(r#"cors_allowed_origins = ["localhost:5173"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let mut config = from_toml("").unwrap();
        config.cors_allowed_origins.clear();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_zero_connect_timeout() {
        let err = from_toml("db_connect_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
