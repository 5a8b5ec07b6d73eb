//! Handlers for the `/collaborations` resource.
//!
//! Admins manage the whole pipeline; artists read the collaborations they are
//! assigned to or addressed by.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::collaboration::{
    CollaborationFilter, CreateCollaboration, RecordPayment, TransitionCollaboration,
    UpdateCollaboration,
};
use beatstore_services::CollaborationService;

use crate::error::AppResult;
use crate::live::snapshot_stream;
use crate::middleware::rbac::{RequireAdmin, RequireArtist};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Admin pipeline
// ---------------------------------------------------------------------------

/// GET /api/v1/collaborations
pub async fn list_collaborations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<CollaborationFilter>,
) -> AppResult<impl IntoResponse> {
    let items = CollaborationService::list(&state.ctx, &admin.caller(), &filter).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/collaborations/live
pub async fn watch_collaborations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<CollaborationFilter>,
) -> AppResult<impl IntoResponse> {
    let subscription = CollaborationService::subscribe(&state.ctx, &admin.caller(), &filter).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/collaborations/stats
pub async fn collaboration_stats(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = CollaborationService::stats(&state.ctx, &admin.caller()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/collaborations
pub async fn create_collaboration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCollaboration>,
) -> AppResult<impl IntoResponse> {
    let collab = CollaborationService::create(&state.ctx, &admin.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: collab })))
}

/// PUT /api/v1/collaborations/{id}
pub async fn update_collaboration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCollaboration>,
) -> AppResult<impl IntoResponse> {
    let collab = CollaborationService::update(&state.ctx, &admin.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: collab }))
}

/// PUT /api/v1/collaborations/{id}/status
///
/// Advance along the pipeline or cancel.
pub async fn transition_collaboration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TransitionCollaboration>,
) -> AppResult<impl IntoResponse> {
    let collab =
        CollaborationService::transition(&state.ctx, &admin.caller(), &id, input.status).await?;
    Ok(Json(DataResponse { data: collab }))
}

/// POST /api/v1/collaborations/{id}/payments
pub async fn record_payment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecordPayment>,
) -> AppResult<impl IntoResponse> {
    let collab =
        CollaborationService::record_payment(&state.ctx, &admin.caller(), &id, input.amount).await?;
    Ok(Json(DataResponse { data: collab }))
}

/// DELETE /api/v1/collaborations/{id}
pub async fn delete_collaboration(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    CollaborationService::delete(&state.ctx, &admin.caller(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Artist view
// ---------------------------------------------------------------------------

/// GET /api/v1/collaborations/mine
pub async fn my_collaborations(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = CollaborationService::list_for_artist(&state.ctx, &artist.caller()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/collaborations/mine/live
pub async fn watch_my_collaborations(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription =
        CollaborationService::subscribe_for_artist(&state.ctx, &artist.caller()).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/collaborations/{id}
pub async fn get_collaboration(
    RequireArtist(user): RequireArtist,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let collab = CollaborationService::get(&state.ctx, &user.caller(), &id).await?;
    Ok(Json(DataResponse { data: collab }))
}
