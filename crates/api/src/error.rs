//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; only this module produces failure responses, as a
//! JSON body of the form `{"error": <message>, "code": <CODE>}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// A resource that can fail to be found, with its error code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    WishlistEntry,
    User,
}

impl Resource {
    /// Machine-readable error code for a missing resource of this kind.
    #[must_use]
    pub const fn not_found_code(self) -> &'static str {
        match self {
            Self::Order => "ORDER_NOT_FOUND",
            Self::WishlistEntry => "WISHLIST_ITEM_NOT_FOUND",
            Self::User => "USER_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Order => write!(f, "Order"),
            Self::WishlistEntry => write!(f, "Wishlist item"),
            Self::User => write!(f, "User"),
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(Resource),

    /// Caller has no valid session.
    #[error("Authentication required")]
    Unauthenticated,

    /// Caller is authenticated but lacks the required role.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code from the closed taxonomy.
    pub code: &'static str,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Machine-readable error code for the response body.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
                AuthError::UserNotFound => "USER_NOT_FOUND",
                AuthError::EmailTaken => "EMAIL_TAKEN",
                AuthError::WeakPassword(_) => "WEAK_PASSWORD",
                AuthError::InvalidEmail(_) => "VALIDATION_FAILED",
                AuthError::PasswordHash | AuthError::Repository(_) => "INTERNAL_ERROR",
            },
            Self::NotFound(resource) => resource.not_found_code(),
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
        }
    }

    /// Message safe to expose to clients.
    ///
    /// Server-side failures collapse to a generic message; everything else
    /// uses the error's own display text.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Invalid email or password".to_string()
                }
                AuthError::EmailTaken => "An account with this email already exists".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::RateLimited => "Too many requests, please slow down".to_string(),
            _ => self.to_string(),
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::PasswordHash | AuthError::Repository(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; the client only ever sees the
        // generic message.
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.client_message(),
            code: self.error_code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Validation("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(Resource::Order).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_specific_not_found_codes() {
        assert_eq!(
            AppError::NotFound(Resource::Order).error_code(),
            "ORDER_NOT_FOUND"
        );
        assert_eq!(
            AppError::NotFound(Resource::WishlistEntry).error_code(),
            "WISHLIST_ITEM_NOT_FOUND"
        );
        assert_eq!(
            AppError::NotFound(Resource::User).error_code(),
            "USER_NOT_FOUND"
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = AppError::Internal("connection string was postgres://user:pw@db".to_string());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid status in row 12".to_string(),
        ));
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_guard_errors_have_stable_codes() {
        assert_eq!(AppError::Unauthenticated.error_code(), "UNAUTHENTICATED");
        assert_eq!(AppError::RateLimited.error_code(), "RATE_LIMITED");
        assert_eq!(AppError::Forbidden.error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound(Resource::WishlistEntry).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
