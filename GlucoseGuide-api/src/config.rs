//! Server configuration read from the environment

use std::env;

use axum::http::HeaderValue;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("CORS_ORIGIN is not a valid header value: '{0}'")]
    InvalidCorsOrigin(String),
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the server listens on
    pub port: u16,
    /// The single origin allowed by CORS
    pub cors_origin: HeaderValue,
    /// Deployment environment name reported by `/health`
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `CORS_ORIGIN` and `APP_ENV`, falling back to defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or(ConfigError::InvalidPort(value))?,
            Err(_) => defaults.port,
        };

        let cors_origin = match env::var("CORS_ORIGIN") {
            Ok(value) => HeaderValue::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidCorsOrigin(value))?,
            Err(_) => defaults.cors_origin,
        };

        let environment = env::var("APP_ENV").unwrap_or(defaults.environment);

        info!(
            "Server configuration: port={}, cors_origin={:?}, environment={}",
            port, cors_origin, environment
        );

        Ok(Self {
            port,
            cors_origin,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.environment, "development");
    }
}
