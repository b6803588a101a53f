//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (DB connectivity)
//!
//! # Auth
//! POST /api/auth/register            - Create a customer account
//! POST /api/auth/login               - Login, stores identity in session
//! POST /api/auth/logout              - Logout
//!
//! # Orders
//! GET    /api/orders/my-orders       - Caller's own orders (by email)
//! GET    /api/orders/{id}            - Order detail (staff)
//! PUT    /api/orders/{id}            - Update allow-listed fields (staff)
//! DELETE /api/orders/{id}            - Delete an order (staff)
//!
//! # Wishlist
//! GET    /api/wishlist               - Caller's wishlist
//! POST   /api/wishlist               - Add a product
//! DELETE /api/wishlist/{id}          - Remove an entry (owner-scoped)
//! GET    /api/wishlist/check/{productId} - Membership check (optional auth)
//! ```
//!
//! Every handler follows the same pipeline: auth guard -> rate limit ->
//! exactly one repository call -> mapped response.

pub mod auth;
pub mod orders;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/my-orders", get(orders::my_orders))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index).post(wishlist::add))
        .route("/{id}", delete(wishlist::remove))
        .route("/check/{product_id}", get(wishlist::check))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/wishlist", wishlist_routes())
}

/// Parse a numeric path segment into an id.
///
/// Route ids are validated here rather than by the `Path<i64>` rejection so
/// that malformed input produces the same JSON error shape as every other
/// failure.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, crate::error::AppError> {
    raw.parse::<i64>()
        .map_err(|_| crate::error::AppError::Validation(format!("{what} must be a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_valid() {
        assert_eq!(parse_id("42", "id").ok(), Some(42));
    }

    #[test]
    fn test_parse_id_invalid() {
        assert!(parse_id("forty-two", "id").is_err());
        assert!(parse_id("", "id").is_err());
        assert!(parse_id("9999999999999999999999", "id").is_err());
    }
}
