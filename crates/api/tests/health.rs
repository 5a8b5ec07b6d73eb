//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, memory_store};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_reports_store() {
    let app = common::build_test_app(memory_store());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store"], "memory");
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(memory_store());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(memory_store());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn errors_use_json_envelope() {
    let app = common::build_test_app(memory_store());
    let response = get(app, "/api/v1/beats/missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn responses_are_gzipped_when_the_client_asks() {
    let app = common::build_test_app(memory_store());
    let request = Request::builder()
        .uri("/api/v1/settings/shop/public")
        .header("accept-encoding", "gzip")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");

    let plain = get(app, "/api/v1/settings/shop/public").await;
    assert!(plain.headers().get("content-encoding").is_none());
}
