//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use willowline_core::{Email, OrderId, OrderStatus};

/// A customer order (domain type).
///
/// Orders are created by checkout and belong to a customer by email - there
/// is no foreign key into the user table, so `my-orders` matches on the
/// session email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer email this order belongs to.
    pub email: Email,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Carrier tracking number, once shipped.
    pub tracking_number: Option<String>,
    /// Shipping carrier name.
    pub carrier: Option<String>,
    /// Free-form staff notes.
    pub notes: Option<String>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (server-set on every mutation).
    pub updated_at: DateTime<Utc>,
}

/// Allow-listed mutable order fields for the staff update operation.
///
/// Only these four fields can ever be written through the API; `updated_at`
/// is set by the repository, never by the caller.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub notes: Option<String>,
}

impl OrderChanges {
    /// Whether the change set touches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.tracking_number.is_none()
            && self.carrier.is_none()
            && self.notes.is_none()
    }
}
