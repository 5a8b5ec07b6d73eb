//! Route definitions for the support chat, mounted at `/chat`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST /messages                  -> send_message
/// GET  /thread                    -> my_thread
/// GET  /thread/live               -> watch_my_thread (SSE)
/// GET  /threads/{user_id}         -> user_thread (owner or admin)
/// GET  /threads/{user_id}/live    -> watch_user_thread (owner or admin, SSE)
/// GET  /conversations             -> list_conversations (admin)
/// GET  /inbox/live                -> watch_inbox (admin, SSE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(chat::send_message))
        .route("/thread", get(chat::my_thread))
        .route("/thread/live", get(chat::watch_my_thread))
        .route("/threads/{user_id}", get(chat::user_thread))
        .route("/threads/{user_id}/live", get(chat::watch_user_thread))
        .route("/conversations", get(chat::list_conversations))
        .route("/inbox/live", get(chat::watch_inbox))
}
