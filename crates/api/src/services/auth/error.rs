//! Authentication error type.

use willowline_core::EmailError;

use crate::db::RepositoryError;

/// Errors from the authentication service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Email or password is wrong. Deliberately indistinguishable from a
    /// missing account to the client.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account exists for the given identity.
    #[error("user not found")]
    UserNotFound,

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// Password does not meet the policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Hashing the password failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
