//! Route definitions for site settings, mounted at `/settings`.

use axum::routing::get;
use axum::Router;

use beatstore_core::settings::{
    GeneralSettings, NotificationSettings, SecuritySettings, ShopSettings,
};

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET      /shop/public      -> public_shop_settings
/// GET, PUT /shop             -> shop section (admin)
/// GET, PUT /general          -> general section (admin)
/// GET, PUT /notifications    -> notification section (admin)
/// GET, PUT /security         -> security section (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shop/public", get(settings::public_shop_settings))
        .route(
            "/shop",
            get(settings::get_section::<ShopSettings>).put(settings::save_section::<ShopSettings>),
        )
        .route(
            "/general",
            get(settings::get_section::<GeneralSettings>)
                .put(settings::save_section::<GeneralSettings>),
        )
        .route(
            "/notifications",
            get(settings::get_section::<NotificationSettings>)
                .put(settings::save_section::<NotificationSettings>),
        )
        .route(
            "/security",
            get(settings::get_section::<SecuritySettings>)
                .put(settings::save_section::<SecuritySettings>),
        )
}
