//! Handlers for the `/beats` resource.
//!
//! Reads are public and see published beats only, unless the caller is an
//! admin. Writes require the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::beat::{BeatFilter, CreateBeat, UpdateBeat};
use beatstore_db::repositories::BeatCounter;
use beatstore_services::beats::{BrowseParams, PageParams};
use beatstore_services::BeatService;

use crate::error::AppResult;
use crate::live::snapshot_stream;
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Storefront reads
// ---------------------------------------------------------------------------

/// GET /api/v1/beats
///
/// One page of beats, filtered by `status`, `genre`, `featured`, `trending`
/// and paged with `limit` / `startAfter`.
pub async fn list_beats(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Query(filter): Query<BeatFilter>,
    Query(page): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let beats = BeatService::list(&state.ctx, auth.caller().as_ref(), filter, &page).await?;
    Ok(Json(DataResponse { data: beats }))
}

/// GET /api/v1/beats/browse
///
/// Storefront search over published beats with `search`, `genre` and `sort`.
pub async fn browse_beats(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> AppResult<impl IntoResponse> {
    let beats = BeatService::browse(&state.ctx, &params).await?;
    Ok(Json(DataResponse { data: beats }))
}

/// GET /api/v1/beats/featured
pub async fn featured_beats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let beats = BeatService::featured(&state.ctx).await?;
    Ok(Json(DataResponse { data: beats }))
}

/// GET /api/v1/beats/trending
pub async fn trending_beats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let beats = BeatService::trending(&state.ctx).await?;
    Ok(Json(DataResponse { data: beats }))
}

/// GET /api/v1/beats/genres
pub async fn list_genres(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let genres = BeatService::genres(&state.ctx).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// GET /api/v1/beats/{id}
pub async fn get_beat(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let beat = BeatService::get(&state.ctx, auth.caller().as_ref(), &id).await?;
    Ok(Json(DataResponse { data: beat }))
}

/// GET /api/v1/beats/live
///
/// Server-Sent Events stream of the filtered listing.
pub async fn watch_beats(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Query(filter): Query<BeatFilter>,
) -> AppResult<impl IntoResponse> {
    let subscription = BeatService::subscribe(&state.ctx, auth.caller().as_ref(), filter).await?;
    Ok(snapshot_stream(subscription))
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// POST /api/v1/beats/{id}/play
pub async fn record_play(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    BeatService::increment(&state.ctx, &id, BeatCounter::Plays).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/beats/{id}/download
pub async fn record_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    BeatService::increment(&state.ctx, &id, BeatCounter::Downloads).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/beats/{id}/like
pub async fn record_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    BeatService::increment(&state.ctx, &id, BeatCounter::Likes).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

/// POST /api/v1/beats
///
/// Create a beat. License tier prices derive from `price`.
pub async fn create_beat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBeat>,
) -> AppResult<impl IntoResponse> {
    let beat = BeatService::create(&state.ctx, &admin.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: beat })))
}

/// PUT /api/v1/beats/{id}
pub async fn update_beat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBeat>,
) -> AppResult<impl IntoResponse> {
    let beat = BeatService::update(&state.ctx, &admin.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: beat }))
}

/// DELETE /api/v1/beats/{id}
pub async fn delete_beat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    BeatService::delete(&state.ctx, &admin.caller(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
