//! HTTP-level integration tests for the `/auth` endpoints.
//!
//! Covers sign-up, sign-in with lockout, refresh rotation, sign-out, the
//! session endpoint and both password flows.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get_auth, memory_store, post_json, post_json_auth, put_json_auth};
use serde_json::json;

use beatstore_core::types::format_timestamp;
use beatstore_db::collections::CREDENTIALS;
use beatstore_db::Fields;
use beatstore_events::{event_types, EventBus};

const PASSWORD: &str = "correct-horse-battery";

async fn sign_up(app: axum::Router, email: &str) -> serde_json::Value {
    let body = json!({ "email": email, "password": PASSWORD, "displayName": "Fan" });
    let response = post_json(app, "/api/v1/auth/sign-up", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn sign_in(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/sign-in",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Sign-up / sign-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_up_creates_customer_and_signs_in() {
    let app = common::build_test_app(memory_store());

    let json = sign_up(app.clone(), "Fan@Example.com").await;
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
    assert_eq!(json["expiresIn"], 15 * 60);
    assert_eq!(json["user"]["email"], "fan@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["dashboardRoute"], "/customer/dashboard");

    let token = json["accessToken"].as_str().unwrap();
    let me = get_auth(app, "/api/v1/auth/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["user"]["displayName"], "Fan");
    assert_eq!(me["data"]["dashboardRoute"], "/customer/dashboard");
}

#[tokio::test]
async fn sign_up_rejects_duplicates_and_bad_input() {
    let app = common::build_test_app(memory_store());
    sign_up(app.clone(), "fan@example.com").await;

    let dup = post_json(
        app.clone(),
        "/api/v1/auth/sign-up",
        json!({ "email": "FAN@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    let bad_email = post_json(
        app.clone(),
        "/api/v1/auth/sign-up",
        json!({ "email": "nope", "password": PASSWORD }),
    )
    .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let short = post_json(
        app,
        "/api/v1/auth/sign-up",
        json!({ "email": "other@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(short).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn sign_in_with_wrong_password_or_unknown_email_is_unauthorized() {
    let app = common::build_test_app(memory_store());
    sign_up(app.clone(), "fan@example.com").await;

    let wrong = sign_in(app.clone(), "fan@example.com", "incorrect-password").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ghost = sign_in(app.clone(), "ghost@example.com", PASSWORD).await;
    assert_eq!(ghost.status(), StatusCode::UNAUTHORIZED);

    let ok = sign_in(app, "fan@example.com", PASSWORD).await;
    assert_eq!(ok.status(), StatusCode::OK);
    let json = body_json(ok).await;
    assert!(json["user"]["lastLoginAt"].is_string());
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let app = common::build_test_app(memory_store());
    sign_up(app.clone(), "fan@example.com").await;

    for _ in 0..5 {
        let response = sign_in(app.clone(), "fan@example.com", "incorrect-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let locked = sign_in(app, "fan@example.com", PASSWORD).await;
    assert_eq!(locked.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn an_expired_lock_starts_a_fresh_count() {
    let store = memory_store();
    let app = common::build_test_app(store.clone());
    let user_id = sign_up(app.clone(), "fan@example.com").await["user"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let expired = format_timestamp(Utc::now() - Duration::minutes(1));
    let mut patch = Fields::new();
    patch.insert("failedLoginCount".into(), json!(5));
    patch.insert("lockedUntil".into(), json!(expired));
    store.update(CREDENTIALS, &user_id, patch).await.unwrap();

    let response = sign_in(app.clone(), "fan@example.com", "incorrect-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let credential = store.get(CREDENTIALS, &user_id).await.unwrap().unwrap();
    assert_eq!(credential.data["failedLoginCount"], json!(1));
    assert!(!credential.data.contains_key("lockedUntil"));

    let ok = sign_in(app, "fan@example.com", PASSWORD).await;
    assert_eq!(ok.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_rotates_the_token() {
    let app = common::build_test_app(memory_store());
    let session = sign_up(app.clone(), "fan@example.com").await;
    let refresh_token = session["refreshToken"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refreshToken": refresh_token }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refreshToken"].as_str().unwrap(), refresh_token);

    let reused = post_json(
        app,
        "/api/v1/auth/refresh",
        json!({ "refreshToken": refresh_token }),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_out_revokes_refresh_tokens() {
    let app = common::build_test_app(memory_store());
    let session = sign_up(app.clone(), "fan@example.com").await;
    let access = session["accessToken"].as_str().unwrap();
    let refresh = session["refreshToken"].as_str().unwrap();

    let response = post_json_auth(app.clone(), "/api/v1/auth/sign-out", json!({}), access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = post_json(app, "/api/v1/auth/refresh", json!({ "refreshToken": refresh })).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = common::build_test_app(memory_store());

    let missing = common::get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

#[tokio::test]
async fn change_password_requires_current_password() {
    let app = common::build_test_app(memory_store());
    let session = sign_up(app.clone(), "fan@example.com").await;
    let access = session["accessToken"].as_str().unwrap();

    let wrong = put_json_auth(
        app.clone(),
        "/api/v1/auth/password",
        json!({ "currentPassword": "incorrect", "newPassword": "brand-new-password" }),
        access,
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = put_json_auth(
        app.clone(),
        "/api/v1/auth/password",
        json!({ "currentPassword": PASSWORD, "newPassword": "brand-new-password" }),
        access,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        sign_in(app.clone(), "fan@example.com", PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        sign_in(app, "fan@example.com", "brand-new-password").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn password_reset_unknown_email_is_accepted() {
    let app = common::build_test_app(memory_store());
    let response = post_json(
        app,
        "/api/v1/auth/password-reset",
        json!({ "email": "ghost@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn password_reset_token_is_single_use() {
    let events = Arc::new(EventBus::default());
    let mut receiver = events.subscribe();
    let app = common::build_test_app_with_events(memory_store(), Arc::clone(&events));
    sign_up(app.clone(), "fan@example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/password-reset",
        json!({ "email": "fan@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let token = loop {
        let event = receiver.recv().await.unwrap();
        if event.event_type == event_types::PASSWORD_RESET_REQUESTED {
            assert_eq!(event.payload_str("email"), Some("fan@example.com"));
            break event.payload_str("resetToken").unwrap().to_string();
        }
    };

    let confirm = json!({ "token": token, "newPassword": "reset-password-123" });
    let first = post_json(app.clone(), "/api/v1/auth/password-reset/confirm", confirm.clone()).await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = post_json(app.clone(), "/api/v1/auth/password-reset/confirm", confirm).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        sign_in(app, "fan@example.com", "reset-password-123").await.status(),
        StatusCode::OK
    );
}
