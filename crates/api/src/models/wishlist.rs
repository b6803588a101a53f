//! Wishlist domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use willowline_core::{ProductId, UserId, WishlistEntryId};

/// A wishlist entry (domain type).
///
/// Unique per `(user_id, product_id)`; owned by exactly one user. Every
/// mutation is scoped to the owner in SQL, so a valid entry id with the
/// wrong owner behaves like a missing row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    /// Unique entry ID.
    pub id: WishlistEntryId,
    /// Owning user.
    pub user_id: UserId,
    /// Wished-for product.
    pub product_id: ProductId,
    /// When the entry was added.
    pub created_at: DateTime<Utc>,
}
