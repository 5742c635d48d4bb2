//! Service configuration module
//! Built once at process start and passed to the components that need it

use crate::constants::{
    DEFAULT_HOST, DEFAULT_LOGIN_MIN_MILLIS, DEFAULT_PORT, DEFAULT_TOKEN_EXPIRE_MINUTES,
    MIN_SECRET_LENGTH,
};
use crate::error::{RapierError, Result};
use std::env;
use std::time::Duration;

/// Service configuration parameters
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// Backend location; only `memory://` is provided in-tree
    pub database_url: String,
    /// Shared HMAC key for bearer token signing/validation
    pub secret_key: String,
    /// Default lifetime of issued access tokens
    pub access_token_ttl: Duration,
    /// Minimum wall time spent on a login attempt
    pub login_min_duration: Duration,
    pub cors_origins: Vec<String>,
    pub debug: bool,
}

impl AppConfig {
    /// Deterministic configuration for tests. Never use outside of tests.
    pub fn for_testing() -> Self {
        Self {
            app_name: "Rapier Auth".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: "memory://".to_string(),
            secret_key: "unit-test-signing-key-0123456789-abcdefghij".to_string(),
            access_token_ttl: Duration::from_secs(DEFAULT_TOKEN_EXPIRE_MINUTES * 60),
            login_min_duration: Duration::ZERO,
            cors_origins: vec!["*".to_string()],
            debug: true,
        }
    }

    /// Validate that the signing key meets security requirements
    fn validate_secret_key(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(RapierError::ConfigError(format!(
                "secret key must be at least {} characters long",
                MIN_SECRET_LENGTH
            )));
        }

        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "change-in-production",
            "changeme",
            "12345678",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(RapierError::ConfigError(format!(
                    "secret key contains insecure pattern '{}'. Generate one with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        Ok(())
    }

    fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app_name = env::var("RAPIER_APP_NAME").unwrap_or_else(|_| "Rapier Auth".to_string());
        let host = env::var("RAPIER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("RAPIER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url =
            env::var("RAPIER_DATABASE_URL").unwrap_or_else(|_| "memory://".to_string());
        if !database_url.starts_with("memory://") {
            return Err(RapierError::ConfigError(format!(
                "unsupported storage backend: {}",
                database_url
            )));
        }

        let secret_key = env::var("RAPIER_SECRET_KEY")
            .or_else(|_| env::var("SECRET_KEY"))
            .map_err(|_| {
                RapierError::ConfigError(
                    "SECRET_KEY environment variable is required. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;
        Self::validate_secret_key(&secret_key)?;

        let expire_minutes = env::var("RAPIER_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_MINUTES);
        if expire_minutes == 0 {
            return Err(RapierError::ConfigError(
                "RAPIER_TOKEN_EXPIRE_MINUTES must be greater than zero".to_string(),
            ));
        }

        let login_min_millis = env::var("RAPIER_LOGIN_MIN_MILLIS")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(DEFAULT_LOGIN_MIN_MILLIS);

        let cors_origins = env::var("RAPIER_CORS_ORIGINS")
            .map(|raw| Self::parse_origins(&raw))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let debug = env::var("RAPIER_DEBUG")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            app_name,
            host,
            port,
            database_url,
            secret_key,
            access_token_ttl: Duration::from_secs(expire_minutes * 60),
            login_min_duration: Duration::from_millis(login_min_millis),
            cors_origins,
            debug,
        })
    }
}
