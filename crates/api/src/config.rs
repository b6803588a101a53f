//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WILLOWLINE_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//! - `WILLOWLINE_BASE_URL` - Public URL for the API
//! - `WILLOWLINE_SESSION_SECRET` - Session signing secret (min 32 chars)
//!
//! ## Optional
//! - `WILLOWLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `WILLOWLINE_PORT` - Listen port (default: 3000)
//! - `WILLOWLINE_RATE_STRICT_PER_MINUTE` - Mutation quota (default: 10)
//! - `WILLOWLINE_RATE_MODERATE_PER_MINUTE` - Read quota (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Willowline API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the API
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Rate limiting quotas
    pub rate_limits: RateLimitConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Rate limiting quotas per tier.
///
/// Thresholds are configuration, not logic: the strict tier covers
/// mutations, the moderate tier covers reads.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests per minute for the strict (mutation) tier.
    pub strict_per_minute: NonZeroU32,
    /// Requests per minute for the moderate (read) tier.
    pub moderate_per_minute: NonZeroU32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            strict_per_minute: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
            moderate_per_minute: NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("WILLOWLINE_DATABASE_URL")?;
        let host = get_env_or_default("WILLOWLINE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WILLOWLINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WILLOWLINE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WILLOWLINE_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("WILLOWLINE_BASE_URL")?;
        let session_secret = get_required_secret("WILLOWLINE_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "WILLOWLINE_SESSION_SECRET")?;

        let rate_limits = RateLimitConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            rate_limits,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let strict_per_minute = get_env_or_default("WILLOWLINE_RATE_STRICT_PER_MINUTE", "10")
            .parse::<NonZeroU32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "WILLOWLINE_RATE_STRICT_PER_MINUTE".to_string(),
                    e.to_string(),
                )
            })?;
        let moderate_per_minute = get_env_or_default("WILLOWLINE_RATE_MODERATE_PER_MINUTE", "60")
            .parse::<NonZeroU32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "WILLOWLINE_RATE_MODERATE_PER_MINUTE".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            strict_per_minute,
            moderate_per_minute,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret is long enough and not a placeholder.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_session_secret_placeholder() {
        let secret = SecretString::from("changeme-changeme-changeme-changeme");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_session_secret_valid() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6j");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_rate_limit_defaults() {
        let limits = RateLimitConfig::default();
        assert_eq!(limits.strict_per_minute.get(), 10);
        assert_eq!(limits.moderate_per_minute.get(), 60);
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            rate_limits: RateLimitConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
