//! Route definitions for the `/beats` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::beats;
use crate::state::AppState;

/// Routes mounted at `/beats`.
///
/// ```text
/// GET    /                -> list_beats
/// POST   /                -> create_beat (admin)
/// GET    /browse          -> browse_beats
/// GET    /featured        -> featured_beats
/// GET    /trending        -> trending_beats
/// GET    /genres          -> list_genres
/// GET    /live            -> watch_beats (SSE)
/// GET    /{id}            -> get_beat
/// PUT    /{id}            -> update_beat (admin)
/// DELETE /{id}            -> delete_beat (admin)
/// POST   /{id}/play       -> record_play
/// POST   /{id}/download   -> record_download
/// POST   /{id}/like       -> record_like
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(beats::list_beats).post(beats::create_beat))
        .route("/browse", get(beats::browse_beats))
        .route("/featured", get(beats::featured_beats))
        .route("/trending", get(beats::trending_beats))
        .route("/genres", get(beats::list_genres))
        .route("/live", get(beats::watch_beats))
        .route(
            "/{id}",
            get(beats::get_beat)
                .put(beats::update_beat)
                .delete(beats::delete_beat),
        )
        .route("/{id}/play", post(beats::record_play))
        .route("/{id}/download", post(beats::record_download))
        .route("/{id}/like", post(beats::record_like))
}
