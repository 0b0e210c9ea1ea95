//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Secret used when `JWT_SECRET` is unset. Fine for local development only.
pub const DEV_JWT_SECRET: &str = "stockbook-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if secret.trim().is_empty() => {
                return Err(ConfigError::InvalidValue("JWT_SECRET".to_string()))
            }
            Ok(secret) => secret,
            Err(_) => {
                warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let config = ApiConfig {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_var("HTTP_PORT", 3000)?,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "store.db".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_access_lifetime_secs: parse_var("JWT_ACCESS_LIFETIME_SECS", 86_400)?, // 1 day
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.jwt_access_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_LIFETIME_SECS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    parse_value(name, env::var(name).ok().as_deref(), default)
}

fn parse_value<T: FromStr>(name: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_default_and_error() {
        assert_eq!(parse_value::<u16>("HTTP_PORT", None, 3000).unwrap(), 3000);
        assert_eq!(parse_value::<u16>("HTTP_PORT", Some(" 8080 "), 3000).unwrap(), 8080);

        assert!(matches!(
            parse_value::<u16>("HTTP_PORT", Some("not-a-port"), 3000),
            Err(ConfigError::InvalidValue(name)) if name == "HTTP_PORT"
        ));
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        assert_eq!(parse_var::<u32>("STOCKBOOK_TEST_NEVER_SET", 5).unwrap(), 5);
    }

    #[test]
    fn test_bind_address() {
        let config = ApiConfig {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            database_path: "store.db".to_string(),
            db_max_connections: 5,
            jwt_secret: "s".to_string(),
            jwt_access_lifetime_secs: 60,
        };
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
