//! Handlers for site settings.
//!
//! Each section is one document. The shop section is public; the rest are
//! admin-only. The section handlers are generic and instantiated per route.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_core::settings::SettingsSection;
use beatstore_services::SettingsService;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings/shop/public
///
/// Storefront toggles and hero text, without audit fields.
pub async fn public_shop_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let shop = SettingsService::shop(&state.ctx).await?;
    Ok(Json(DataResponse { data: shop }))
}

/// GET /api/v1/settings/{section}
pub async fn get_section<T: SettingsSection + 'static>(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let doc = SettingsService::get::<T>(&state.ctx, &admin.caller()).await?;
    Ok(Json(DataResponse { data: doc }))
}

/// PUT /api/v1/settings/{section}
///
/// Replace the whole section. Missing fields fall back to their defaults.
pub async fn save_section<T: SettingsSection + 'static>(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(section): Json<T>,
) -> AppResult<impl IntoResponse> {
    let doc = SettingsService::save(&state.ctx, &admin.caller(), section).await?;
    Ok(Json(DataResponse { data: doc }))
}
