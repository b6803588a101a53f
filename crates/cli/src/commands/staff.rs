//! Staff account management commands.
//!
//! Staff accounts never come from the public registration endpoint; they
//! are created or promoted here, by an operator with database access.
//!
//! # Environment Variables
//!
//! - `WILLOWLINE_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use willowline_core::{Email, UserRole};

use super::CliError;

/// Minimum password length, matching the API's registration policy.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a new staff account.
///
/// # Errors
///
/// Returns `CliError::UserExists` if an account already uses the email, or
/// `CliError::InvalidEmail` / `CliError::WeakPassword` on bad input.
pub async fn create(email: &str, password: &str) -> Result<i64, CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CliError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)?;

    let pool = super::connect().await?;

    tracing::info!("Creating staff account: {}", email);

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(CliError::UserExists(email.to_string()));
    }

    let user_id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO users (email, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING id
        ",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(UserRole::Staff.to_string())
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Staff account created! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}

/// Promote an existing account to staff.
///
/// The new role takes effect on the account's next login; existing sessions
/// keep the role they were issued with.
///
/// # Errors
///
/// Returns `CliError::UserNotFound` if no account uses the email.
pub async fn promote(email: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidEmail(e.to_string()))?;

    let pool = super::connect().await?;

    tracing::info!("Promoting account to staff: {}", email);

    let result = sqlx::query(
        r"
        UPDATE users
        SET role = $2, updated_at = now()
        WHERE email = $1
        ",
    )
    .bind(email.as_str())
    .bind(UserRole::Staff.to_string())
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::UserNotFound(email.to_string()));
    }

    tracing::info!("Account promoted. Role applies from the next login.");

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, CliError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CliError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_phc_string() {
        let hash = hash_password("cover-drive-2026").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }
}
