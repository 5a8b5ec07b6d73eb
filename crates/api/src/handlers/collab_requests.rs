//! Handlers for the `/collab-requests` resource.
//!
//! Artists submit collaboration requests; admins review them. Approval opens
//! a collaboration for the requesting artist.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::collab_request::{CreateCollabRequest, ReviewRequest};
use beatstore_services::CollabRequestService;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireArtist};
use crate::query::RequestStatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/collab-requests
pub async fn submit_request(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
    Json(input): Json<CreateCollabRequest>,
) -> AppResult<impl IntoResponse> {
    let request = CollabRequestService::submit(&state.ctx, &artist.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/collab-requests/mine
pub async fn my_requests(
    RequireArtist(artist): RequireArtist,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = CollabRequestService::list_mine(&state.ctx, &artist.caller()).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/collab-requests
pub async fn list_requests(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RequestStatusParams>,
) -> AppResult<impl IntoResponse> {
    let requests = CollabRequestService::list(&state.ctx, &admin.caller(), params.status).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/collab-requests/{id}/approve
///
/// Returns the approved request together with the new collaboration.
pub async fn approve_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(review): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let approved = CollabRequestService::approve(&state.ctx, &admin.caller(), &id, review).await?;
    Ok(Json(DataResponse { data: approved }))
}

/// POST /api/v1/collab-requests/{id}/reject
pub async fn reject_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(review): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let request = CollabRequestService::reject(&state.ctx, &admin.caller(), &id, review).await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/collab-requests/{id}
pub async fn delete_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    CollabRequestService::delete(&state.ctx, &admin.caller(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
