//! Wishlist endpoints.
//!
//! All wishlist data is owner-scoped: list, add and remove require a session
//! and never accept a user id from the client. The membership check accepts
//! anonymous callers so product pages can render a heart icon without
//! forcing a login; anonymous answers are always "not in wishlist" and the
//! path segment is not even parsed in that case.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use willowline_core::{ProductId, WishlistEntryId};

use crate::error::{AppError, Resource, Result};
use crate::middleware::{ClientIp, OptionalUser, RateKey, RateTier, RequireUser};
use crate::models::WishlistEntry;
use crate::routes::parse_id;
use crate::state::AppState;

/// Request body for adding a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddWishlistRequest {
    pub product_id: i64,
}

/// Response body for the wishlist listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponse {
    pub items: Vec<WishlistEntry>,
    pub count: usize,
}

/// Response body for the membership check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub success: bool,
    pub is_in_wishlist: bool,
    pub wishlist_id: Option<WishlistEntryId>,
}

/// Response body for a successful removal.
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub success: bool,
    pub message: &'static str,
}

/// POST /api/wishlist
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ClientIp(ip): ClientIp,
    Json(body): Json<AddWishlistRequest>,
) -> Result<(StatusCode, Json<WishlistEntry>)> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::user(user.id, ip))?;

    if body.product_id <= 0 {
        return Err(AppError::Validation(
            "productId must be a positive number".to_string(),
        ));
    }

    let entry = state
        .wishlist()
        .add(user.id, ProductId::new(body.product_id))
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        })?;

    tracing::info!(entry_id = %entry.id, product_id = %entry.product_id, "Wishlist entry added");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/wishlist
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ClientIp(ip): ClientIp,
) -> Result<Json<WishlistResponse>> {
    state
        .rate_limits()
        .check(RateTier::Moderate, &RateKey::user(user.id, ip))?;

    let items = state.wishlist().list(user.id).await?;
    let count = items.len();

    Ok(Json(WishlistResponse { items, count }))
}

/// DELETE /api/wishlist/{id}
///
/// Removal is owner-scoped in the repository; an entry owned by someone
/// else reads as not found, never as forbidden.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<String>,
) -> Result<Json<RemoveResponse>> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::user(user.id, ip))?;

    let entry_id = WishlistEntryId::new(parse_id(&id, "wishlist id")?);
    let deleted = state.wishlist().delete(entry_id, user.id).await?;

    if !deleted {
        return Err(AppError::NotFound(Resource::WishlistEntry));
    }

    Ok(Json(RemoveResponse {
        success: true,
        message: "Removed from wishlist",
    }))
}

/// GET /api/wishlist/check/{productId}
///
/// Anonymous callers always get a successful "not in wishlist" answer
/// without the path segment being validated; only authenticated calls parse
/// the product id and hit the database.
#[instrument(skip(state, user))]
pub async fn check(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    ClientIp(ip): ClientIp,
    Path(product_id): Path<String>,
) -> Result<Json<CheckResponse>> {
    let Some(user) = user else {
        state
            .rate_limits()
            .check(RateTier::Moderate, &RateKey::anonymous(ip))?;

        return Ok(Json(CheckResponse {
            success: true,
            is_in_wishlist: false,
            wishlist_id: None,
        }));
    };

    state
        .rate_limits()
        .check(RateTier::Moderate, &RateKey::user(user.id, ip))?;

    let product_id = ProductId::new(parse_id(&product_id, "productId")?);
    let entry = state.wishlist().find_by_product(user.id, product_id).await?;

    Ok(Json(CheckResponse {
        success: true,
        is_in_wishlist: entry.is_some(),
        wishlist_id: entry.map(|e| e.id),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_rejects_unknown_fields() {
        let result: std::result::Result<AddWishlistRequest, _> =
            serde_json::from_str(r#"{"productId": 3, "userId": 99}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_request_parses_camel_case() {
        let body: AddWishlistRequest = serde_json::from_str(r#"{"productId": 3}"#).unwrap();
        assert_eq!(body.product_id, 3);
    }

    #[test]
    fn test_check_response_shape_for_anonymous() {
        let response = CheckResponse {
            success: true,
            is_in_wishlist: false,
            wishlist_id: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["isInWishlist"], false);
        assert!(json["wishlistId"].is_null());
    }

    #[test]
    fn test_check_response_shape_for_member() {
        let response = CheckResponse {
            success: true,
            is_in_wishlist: true,
            wishlist_id: Some(WishlistEntryId::new(12)),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isInWishlist"], true);
        assert_eq!(json["wishlistId"], 12);
    }
}
