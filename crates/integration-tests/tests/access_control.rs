//! Access-control pipeline tests over the real router.
//!
//! Guards and rate limits must reject before any persistence call: the
//! harness pool points at an unreachable address, so a handler that reaches
//! the database answers 500. Any 401/403/429 therefore proves the pipeline
//! stopped the request first.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use willowline_core::UserRole;
use willowline_integration_tests::{TestApp, body_json};

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn delete_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn guarded_route_rejects_without_session() {
    let app = TestApp::new();

    let response = app.send(get("/api/wishlist")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn guarded_mutation_rejects_without_session() {
    let app = TestApp::new();

    // A 401 rather than a 500 shows the handler never touched the
    // (unreachable) database.
    let response = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri("/api/orders/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn customer_cannot_reach_staff_order_routes() {
    let app = TestApp::new();
    let cookie = app.session_cookie(UserRole::Customer).await;

    let response = app.send(get_with_cookie("/api/orders/5", &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn anonymous_wishlist_check_ignores_product_id() {
    let app = TestApp::new();

    // Non-numeric segment: for an anonymous caller this must still be a
    // successful "not in wishlist", never a validation error.
    let response = app.send(get("/api/wishlist/check/not-a-number")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["isInWishlist"], false);
    assert!(json["wishlistId"].is_null());
}

#[tokio::test]
async fn wishlist_check_validates_product_id_with_session() {
    let app = TestApp::new();
    let cookie = app.session_cookie(UserRole::Customer).await;

    let response = app
        .send(get_with_cookie("/api/wishlist/check/not-a-number", &cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn read_quota_exhaustion_returns_rate_limited() {
    let app = TestApp::with_quotas(10, 2);

    for _ in 0..2 {
        let response = app.send(get("/api/wishlist/check/3")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.send(get("/api/wishlist/check/3")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
}

#[tokio::test]
async fn mutation_quota_checked_before_persistence() {
    let app = TestApp::with_quotas(1, 60);
    let cookie = app.session_cookie(UserRole::Customer).await;

    // First delete clears the limiter and then fails on the unreachable
    // database; the caller sees a 500.
    let response = app.send(delete_with_cookie("/api/wishlist/1", &cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Second delete is over quota: rejected with 429 and no database
    // attempt, so no 500 this time.
    let response = app.send(delete_with_cookie("/api/wishlist/1", &cookie)).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");
}
