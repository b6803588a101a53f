//! Authentication endpoints.
//!
//! Register, login and logout. All three are session-based: a successful
//! register or login writes the typed [`CurrentUser`] claim into the session
//! and the cookie does the rest. Register and login run under the strict
//! rate tier keyed by client IP, since the caller has no identity yet.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use willowline_core::{Email, UserId, UserRole};

use crate::error::{AppError, Result};
use crate::middleware::{ClientIp, RateKey, RateTier, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User data returned from auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response body for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Response body for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/auth/register
#[instrument(skip(state, session, body))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ClientIp(ip): ClientIp,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::anonymous(ip))?;

    let service = AuthService::new(state.pool());
    let user = service.register(&body.email, &body.password).await?;

    set_current_user(&session, &CurrentUser::from_user(&user))
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, "New account registered");

    Ok(Json(AuthResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/login
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ClientIp(ip): ClientIp,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::anonymous(ip))?;

    let service = AuthService::new(state.pool());
    let user = service.login(&body.email, &body.password).await?;

    // Rotate the session id so a pre-login cookie can't be fixed onto the
    // authenticated session.
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("failed to cycle session: {e}")))?;

    set_current_user(&session, &CurrentUser::from_user(&user))
        .await
        .map_err(|e| AppError::Internal(format!("failed to write session: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/logout
///
/// Always succeeds, even for callers without a session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<LogoutResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(LogoutResponse {
        success: true,
        message: "Logged out",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_unknown_fields() {
        let result: std::result::Result<RegisterRequest, _> = serde_json::from_str(
            r#"{"email": "a@b.com", "password": "hunter22", "role": "staff"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_register_request_parses() {
        let body: RegisterRequest =
            serde_json::from_str(r#"{"email": "a@b.com", "password": "hunter22"}"#).unwrap();
        assert_eq!(body.email, "a@b.com");
        assert_eq!(body.password, "hunter22");
    }

    #[test]
    fn test_auth_response_shape() {
        let response = AuthResponse {
            success: true,
            user: UserResponse {
                id: UserId::new(7),
                email: Email::parse("kit@willowline.test").unwrap(),
                role: UserRole::Customer,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["user"]["email"], "kit@willowline.test");
        assert_eq!(json["user"]["role"], "customer");
    }
}
