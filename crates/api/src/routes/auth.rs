//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up                  -> sign_up
/// POST /sign-in                  -> sign_in
/// POST /refresh                  -> refresh
/// POST /sign-out                 -> sign_out (requires auth)
/// GET  /me                       -> me (requires auth)
/// PUT  /profile                  -> update_profile (requires auth)
/// PUT  /password                 -> change_password (requires auth)
/// POST /password-reset           -> request_password_reset
/// POST /password-reset/confirm   -> confirm_password_reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/password", put(auth::change_password))
        .route("/password-reset", post(auth::request_password_reset))
        .route("/password-reset/confirm", post(auth::confirm_password_reset))
}
