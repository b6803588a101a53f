//! CLI command implementations.

pub mod migrate;
pub mod staff;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

/// Errors shared by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password does not meet the policy.
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Account already exists.
    #[error("Account already exists with email: {0}")]
    UserExists(String),

    /// No account for the given email.
    #[error("No account found with email: {0}")]
    UserNotFound(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Connect to the application database from the environment.
///
/// Reads `WILLOWLINE_DATABASE_URL`, falling back to `DATABASE_URL`. The URL
/// carries credentials, so it is held as a `SecretString` and never logged.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = database_url(
        std::env::var("WILLOWLINE_DATABASE_URL").ok(),
        std::env::var("DATABASE_URL").ok(),
    )?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}

/// Pick the database URL from the primary variable or its fallback.
fn database_url(
    primary: Option<String>,
    fallback: Option<String>,
) -> Result<SecretString, CliError> {
    primary
        .or(fallback)
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("WILLOWLINE_DATABASE_URL"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_prefers_primary() {
        let url = database_url(
            Some("postgres://primary/wl".to_owned()),
            Some("postgres://fallback/wl".to_owned()),
        )
        .unwrap();
        assert_eq!(url.expose_secret(), "postgres://primary/wl");
    }

    #[test]
    fn test_database_url_falls_back() {
        let url = database_url(None, Some("postgres://fallback/wl".to_owned())).unwrap();
        assert_eq!(url.expose_secret(), "postgres://fallback/wl");
    }

    #[test]
    fn test_database_url_missing() {
        assert!(matches!(
            database_url(None, None),
            Err(CliError::MissingEnvVar("WILLOWLINE_DATABASE_URL"))
        ));
    }

    #[test]
    fn test_database_url_is_not_debug_printable() {
        let url = database_url(Some("postgres://user:pw@db/wl".to_owned()), None).unwrap();
        assert!(!format!("{url:?}").contains("pw"));
    }
}
