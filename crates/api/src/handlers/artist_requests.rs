//! Handlers for the `/artist-requests` resource: customers applying for the
//! artist role, admins deciding.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::artist_request::CreateArtistRoleRequest;
use beatstore_db::models::collab_request::ReviewRequest;
use beatstore_services::ArtistRoleRequestService;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::RequestStatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/artist-requests
///
/// Only customers may apply, and only one pending application at a time.
pub async fn submit_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArtistRoleRequest>,
) -> AppResult<impl IntoResponse> {
    let request = ArtistRoleRequestService::submit(&state.ctx, &auth.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/artist-requests/mine
pub async fn my_applications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = ArtistRoleRequestService::list_mine(&state.ctx, &auth.caller()).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/artist-requests
pub async fn list_applications(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RequestStatusParams>,
) -> AppResult<impl IntoResponse> {
    let requests =
        ArtistRoleRequestService::list(&state.ctx, &admin.caller(), params.status).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/artist-requests/{id}/approve
///
/// Promotes the applicant. The new role reaches their token on next refresh.
pub async fn approve_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(review): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let request =
        ArtistRoleRequestService::approve(&state.ctx, &admin.caller(), &id, review).await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/artist-requests/{id}/reject
pub async fn reject_application(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(review): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let request =
        ArtistRoleRequestService::reject(&state.ctx, &admin.caller(), &id, review).await?;
    Ok(Json(DataResponse { data: request }))
}
