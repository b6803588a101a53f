//! Order endpoints.
//!
//! Staff manage individual orders by id; customers can only list their own
//! orders, matched by the email on their session. Mutations run under the
//! strict rate tier, reads under the moderate tier, always keyed by the
//! caller's user id plus client IP.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use willowline_core::{OrderId, OrderStatus};

use crate::error::{AppError, Resource, Result};
use crate::middleware::{ClientIp, RateKey, RateTier, RequireStaff, RequireUser};
use crate::models::{Order, OrderChanges};
use crate::routes::parse_id;
use crate::state::AppState;

/// Request body for the staff order update.
///
/// Exactly the four allow-listed fields. `deny_unknown_fields` means a
/// payload trying to smuggle `email`, `id` or anything else is rejected
/// outright instead of silently ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub notes: Option<String>,
}

impl From<UpdateOrderRequest> for OrderChanges {
    fn from(body: UpdateOrderRequest) -> Self {
        Self {
            status: body.status,
            tracking_number: body.tracking_number,
            carrier: body.carrier,
            notes: body.notes,
        }
    }
}

/// Response body for the order list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub count: usize,
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

/// GET /api/orders/my-orders
///
/// Orders belonging to the caller, newest first. Matched by the session
/// email, so a customer sees orders placed before they registered.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ClientIp(ip): ClientIp,
) -> Result<Json<OrderListResponse>> {
    state
        .rate_limits()
        .check(RateTier::Moderate, &RateKey::user(user.id, ip))?;

    let orders = state.orders().list_by_email(&user.email).await?;
    let count = orders.len();

    Ok(Json(OrderListResponse { orders, count }))
}

/// GET /api/orders/{id} (staff)
#[instrument(skip(state, staff), fields(staff_id = %staff.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientIp(ip): ClientIp,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    state
        .rate_limits()
        .check(RateTier::Moderate, &RateKey::user(staff.id, ip))?;

    let order_id = OrderId::new(parse_id(&id, "order id")?);
    let order = state
        .orders()
        .get(order_id)
        .await?
        .ok_or(AppError::NotFound(Resource::Order))?;

    Ok(Json(order))
}

/// PUT /api/orders/{id} (staff)
///
/// Applies the allow-listed fields in a single update; `updated_at` is set
/// server-side. An empty change set is a validation error, not a no-op.
#[instrument(skip(state, staff, body), fields(staff_id = %staff.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientIp(ip): ClientIp,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::user(staff.id, ip))?;

    let order_id = OrderId::new(parse_id(&id, "order id")?);
    let changes = OrderChanges::from(body);

    if changes.is_empty() {
        return Err(AppError::Validation(
            "no updatable fields provided".to_string(),
        ));
    }

    let order = state
        .orders()
        .update(order_id, &changes)
        .await?
        .ok_or(AppError::NotFound(Resource::Order))?;

    tracing::info!(order_id = %order.id, "Order updated");

    Ok(Json(order))
}

/// DELETE /api/orders/{id} (staff)
#[instrument(skip(state, staff), fields(staff_id = %staff.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientIp(ip): ClientIp,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state
        .rate_limits()
        .check(RateTier::Strict, &RateKey::user(staff.id, ip))?;

    let order_id = OrderId::new(parse_id(&id, "order id")?);
    let deleted = state.orders().delete(order_id).await?;

    if !deleted {
        return Err(AppError::NotFound(Resource::Order));
    }

    tracing::info!(order_id = %order_id, "Order deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: "Order deleted",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_rejects_unknown_fields() {
        // Mass-assignment attempt: email is not on the allow-list.
        let result: std::result::Result<UpdateOrderRequest, _> = serde_json::from_str(
            r#"{"status": "shipped", "email": "attacker@evil.test"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_rejects_id_field() {
        let result: std::result::Result<UpdateOrderRequest, _> =
            serde_json::from_str(r#"{"id": 99, "notes": "swap target"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_allows_partial_payloads() {
        let body: UpdateOrderRequest =
            serde_json::from_str(r#"{"trackingNumber": "RM123456789GB"}"#).unwrap();
        let changes = OrderChanges::from(body);

        assert_eq!(changes.tracking_number.as_deref(), Some("RM123456789GB"));
        assert!(changes.status.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_empty_update_request_is_empty_change_set() {
        let body: UpdateOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(OrderChanges::from(body).is_empty());
    }

    #[test]
    fn test_update_request_rejects_invalid_status() {
        let result: std::result::Result<UpdateOrderRequest, _> =
            serde_json::from_str(r#"{"status": "teleported"}"#);
        assert!(result.is_err());
    }
}
