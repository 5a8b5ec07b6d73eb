#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use beatstore_api::auth::jwt::{generate_access_token, JwtConfig};
use beatstore_api::config::{ServerConfig, StoreBackend};
use beatstore_api::router::build_app_router;
use beatstore_api::state::AppState;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_db::models::user::NewUser;
use beatstore_db::repositories::UserRepo;
use beatstore_db::{DocumentStore, MemoryDocumentStore};
use beatstore_events::EventBus;

/// Build a test `ServerConfig` with safe defaults: in-memory store, no
/// upload proxy and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        upload_proxy_url: None,
        upload_proxy_api_key: None,
        password_min_length: 8,
        password_reset_expiry_mins: 60,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// A fresh in-memory store shared by the app and the test body.
pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryDocumentStore::new())
}

/// Build the full application router with all middleware layers over `store`.
pub fn build_test_app(store: Arc<dyn DocumentStore>) -> Router {
    build_test_app_with_events(store, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`], with a bus the test can subscribe to.
pub fn build_test_app_with_events(store: Arc<dyn DocumentStore>, events: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState::new(store, events, config.clone());
    build_app_router(state, &config)
}

/// Mint an access token the way sign-in does.
pub fn token_for(user_id: &str, email: &str, role: Role) -> String {
    let caller = Caller::new(user_id, email, role);
    generate_access_token(&caller, &test_config().jwt).expect("token generation should succeed")
}

pub fn admin_token() -> String {
    token_for("admin-1", "admin@example.com", Role::Admin)
}

pub fn artist_token() -> String {
    token_for("artist-1", "artist@example.com", Role::Artist)
}

pub fn customer_token() -> String {
    token_for("user-1", "fan@example.com", Role::User)
}

/// Store a profile so handlers that look the caller up can find it.
pub async fn seed_user(store: &dyn DocumentStore, id: &str, email: &str, role: Role) {
    UserRepo::create(
        store,
        id,
        &NewUser {
            email: email.to_string(),
            display_name: None,
            photo_url: None,
            role,
        },
    )
    .await
    .expect("user creation should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("request should not fail")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
