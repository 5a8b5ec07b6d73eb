//! Route definitions for the `/content` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /              -> list_content
/// POST   /              -> create_content (admin)
/// GET    /published     -> published_content
/// GET    /featured      -> featured_content
/// GET    /live          -> watch_content (SSE)
/// GET    /slug/{slug}   -> get_content_by_slug
/// GET    /{id}          -> get_content
/// PUT    /{id}          -> update_content (admin)
/// DELETE /{id}          -> delete_content (admin)
/// POST   /{id}/view     -> record_view
/// POST   /{id}/like     -> record_like
/// POST   /{id}/share    -> record_share
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content::list_content).post(content::create_content))
        .route("/published", get(content::published_content))
        .route("/featured", get(content::featured_content))
        .route("/live", get(content::watch_content))
        .route("/slug/{slug}", get(content::get_content_by_slug))
        .route(
            "/{id}",
            get(content::get_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )
        .route("/{id}/view", post(content::record_view))
        .route("/{id}/like", post(content::record_like))
        .route("/{id}/share", post(content::record_share))
}
