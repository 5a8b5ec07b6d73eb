//! Route definitions for user profiles and the admin analytics overview.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{analytics, orders, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /                -> list_users (admin, ?role=)
/// GET /{id}            -> get_user (owner or admin)
/// PUT /{id}            -> update_user (owner or admin)
/// PUT /{id}/role       -> update_user_role (admin)
/// GET /{id}/orders     -> customer_orders (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{id}", get(users::get_user).put(users::update_user))
        .route("/{id}/role", put(users::update_user_role))
        .route("/{id}/orders", get(orders::customer_orders))
}

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /   -> overview (admin)
/// ```
pub fn analytics_router() -> Router<AppState> {
    Router::new().route("/", get(analytics::overview))
}
