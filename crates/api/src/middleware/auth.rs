//! Authentication extractors.
//!
//! Identity is resolved once at the boundary: extractors read the typed
//! [`CurrentUser`] claim out of the session and reject before the handler
//! body runs. Rejections are `AppError` values, so unauthenticated and
//! under-privileged callers get the same JSON error shape as everything
//! else.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use willowline_core::UserRole;

use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthenticated)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this never rejects; anonymous callers yield `None`.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires a staff user.
///
/// Unauthenticated callers get 401; authenticated customers get 403. The
/// role is the typed claim stored at login, never re-derived per request.
pub struct RequireStaff(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Staff {
            return Err(AppError::Forbidden);
        }

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;
    use willowline_core::{Email, UserId};

    fn parts() -> Parts {
        let (parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        parts
    }

    async fn parts_with_user(role: UserRole) -> Parts {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let user = CurrentUser {
            id: UserId::new(7),
            email: Email::parse("kit@willowline.test").unwrap(),
            role,
        };
        set_current_user(&session, &user).await.unwrap();

        let mut parts = parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_require_user_rejects_without_session() {
        let mut parts = parts();
        let result = RequireUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_require_user_rejects_empty_session() {
        let mut parts = parts();
        parts
            .extensions
            .insert(Session::new(None, Arc::new(MemoryStore::default()), None));

        let result = RequireUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_require_staff_rejects_customer() {
        let mut parts = parts_with_user(UserRole::Customer).await;
        let result = RequireStaff::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_require_staff_accepts_staff() {
        let mut parts = parts_with_user(UserRole::Staff).await;
        let RequireStaff(user) = RequireStaff::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.id, UserId::new(7));
    }

    #[tokio::test]
    async fn test_optional_user_is_none_without_session() {
        let mut parts = parts();
        let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }
}
