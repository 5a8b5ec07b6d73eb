use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use beatstore_core::settings::{SettingsSection, ShopSettings};
use beatstore_db::collections::SETTINGS;
use beatstore_db::DocumentStore;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Which document store backs this instance.
    pub store: &'static str,
    /// Whether the document store answered a probe read.
    pub store_healthy: bool,
}

/// GET /health -- returns service and document store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_healthy = state.store().get(SETTINGS, ShopSettings::KEY).await.is_ok();

    let status = if store_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: state.config.store_backend.as_str(),
        store_healthy,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
