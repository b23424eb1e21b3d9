//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_TIMEOUT_SECONDS, DEFAULT_DATABASE_URL,
    DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_JWT_REFRESH_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_timeout: Duration,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub jwt_refresh_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Upload endpoint of the license document store; uploads are refused when unset
    pub file_store_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("database_timeout", &self.database_timeout)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("jwt_refresh_expiration_hours", &self.jwt_refresh_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("file_store_url", &self.file_store_url)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the store and secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than the minimum length.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        validate_secret(&jwt_secret)?;

        Ok(Self {
            database_url: database_url.into(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            database_timeout: Duration::from_secs(DEFAULT_DATABASE_TIMEOUT_SECONDS),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            jwt_refresh_expiration_hours: DEFAULT_JWT_REFRESH_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            file_store_url: None,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;

        config.database_max_connections =
            parse_env("DATABASE_MAX_CONNECTIONS").unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);
        config.database_timeout = Duration::from_secs(
            parse_env("DATABASE_TIMEOUT_SECONDS").unwrap_or(DEFAULT_DATABASE_TIMEOUT_SECONDS),
        );
        config.jwt_expiration_hours =
            parse_env("JWT_EXPIRATION_HOURS").unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS);
        config.jwt_refresh_expiration_hours = parse_env("JWT_REFRESH_EXPIRATION_HOURS")
            .unwrap_or(DEFAULT_JWT_REFRESH_EXPIRATION_HOURS);
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT);
        config.file_store_url = env::var("FILE_STORE_URL").ok().filter(|url| !url.is_empty());

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn validate_secret(secret: &str) -> AppResult<()> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::validation(format!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        )));
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
