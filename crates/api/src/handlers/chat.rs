//! Handlers for the support chat.
//!
//! Customers and artists write to support; admins reply to a named user and
//! read the grouped inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::support_message::SendMessage;
use beatstore_services::ChatService;

use crate::error::AppResult;
use crate::live::snapshot_stream;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::RoleParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/chat/messages
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessage>,
) -> AppResult<impl IntoResponse> {
    let message = ChatService::send(&state.ctx, &auth.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/chat/thread
///
/// The signed-in user's own thread with support.
pub async fn my_thread(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let messages = ChatService::thread(&state.ctx, &auth.caller(), &auth.user_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/chat/thread/live
pub async fn watch_my_thread(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription = ChatService::subscribe_thread(&state.ctx, &auth.caller(), &auth.user_id).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/chat/threads/{user_id}
pub async fn user_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let messages = ChatService::thread(&state.ctx, &auth.caller(), &user_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// GET /api/v1/chat/threads/{user_id}/live
pub async fn watch_user_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let subscription = ChatService::subscribe_thread(&state.ctx, &auth.caller(), &user_id).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/chat/conversations
///
/// Admin inbox grouped by user, optionally narrowed by `role` and `search`.
pub async fn list_conversations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RoleParams>,
) -> AppResult<impl IntoResponse> {
    let conversations = ChatService::conversations(
        &state.ctx,
        &admin.caller(),
        params.role,
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: conversations }))
}

/// GET /api/v1/chat/inbox/live
///
/// Every message, newest first, as a live stream.
pub async fn watch_inbox(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription = ChatService::subscribe_inbox(&state.ctx, &admin.caller()).await?;
    Ok(snapshot_stream(subscription))
}
