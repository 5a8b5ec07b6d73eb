//! Route definitions for collaborations and the requests that feed them.
//!
//! Three routers are provided:
//! - `router()` for the pipeline, mounted at `/collaborations`
//! - `requests_router()` for artist collab requests, mounted at `/collab-requests`
//! - `artist_requests_router()` for artist-role applications, mounted at `/artist-requests`

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{artist_requests, collab_requests, collaborations};
use crate::state::AppState;

/// Routes mounted at `/collaborations`.
///
/// ```text
/// GET    /                -> list_collaborations (admin)
/// POST   /                -> create_collaboration (admin)
/// GET    /live            -> watch_collaborations (admin, SSE)
/// GET    /stats           -> collaboration_stats (admin)
/// GET    /mine            -> my_collaborations (artist)
/// GET    /mine/live       -> watch_my_collaborations (artist, SSE)
/// GET    /{id}            -> get_collaboration (admin or involved artist)
/// PUT    /{id}            -> update_collaboration (admin)
/// DELETE /{id}            -> delete_collaboration (admin)
/// PUT    /{id}/status     -> transition_collaboration (admin)
/// POST   /{id}/payments   -> record_payment (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collaborations::list_collaborations).post(collaborations::create_collaboration),
        )
        .route("/live", get(collaborations::watch_collaborations))
        .route("/stats", get(collaborations::collaboration_stats))
        .route("/mine", get(collaborations::my_collaborations))
        .route("/mine/live", get(collaborations::watch_my_collaborations))
        .route(
            "/{id}",
            get(collaborations::get_collaboration)
                .put(collaborations::update_collaboration)
                .delete(collaborations::delete_collaboration),
        )
        .route("/{id}/status", put(collaborations::transition_collaboration))
        .route("/{id}/payments", post(collaborations::record_payment))
}

/// Routes mounted at `/collab-requests`.
///
/// ```text
/// GET    /               -> list_requests (admin, ?status=)
/// POST   /               -> submit_request (artist)
/// GET    /mine           -> my_requests (artist)
/// DELETE /{id}           -> delete_request (admin)
/// POST   /{id}/approve   -> approve_request (admin)
/// POST   /{id}/reject    -> reject_request (admin)
/// ```
pub fn requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(collab_requests::list_requests).post(collab_requests::submit_request),
        )
        .route("/mine", get(collab_requests::my_requests))
        .route("/{id}", delete(collab_requests::delete_request))
        .route("/{id}/approve", post(collab_requests::approve_request))
        .route("/{id}/reject", post(collab_requests::reject_request))
}

/// Routes mounted at `/artist-requests`.
///
/// ```text
/// GET    /               -> list_applications (admin, ?status=)
/// POST   /               -> submit_application (customer)
/// GET    /mine           -> my_applications
/// POST   /{id}/approve   -> approve_application (admin)
/// POST   /{id}/reject    -> reject_application (admin)
/// ```
pub fn artist_requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(artist_requests::list_applications).post(artist_requests::submit_application),
        )
        .route("/mine", get(artist_requests::my_applications))
        .route("/{id}/approve", post(artist_requests::approve_application))
        .route("/{id}/reject", post(artist_requests::reject_application))
}
