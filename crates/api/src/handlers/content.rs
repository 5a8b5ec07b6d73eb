//! Handlers for the `/content` resource (blog, news, tutorials, press).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use beatstore_core::catalog::{clamp_page_size, FEATURED_LIMIT};
use beatstore_core::status::ContentType;
use beatstore_db::models::content::{ContentFilter, CreateContent, UpdateContent};
use beatstore_db::repositories::ContentCounter;
use beatstore_services::ContentService;

use crate::error::AppResult;
use crate::live::snapshot_stream;
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /content/published`.
#[derive(Debug, Default, Deserialize)]
pub struct PublishedParams {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/content
///
/// Filtered listing. Non-admins only ever see published items.
pub async fn list_content(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Query(filter): Query<ContentFilter>,
) -> AppResult<impl IntoResponse> {
    let items = ContentService::list(&state.ctx, auth.caller().as_ref(), filter).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/content/published
///
/// Published items, most recently published first.
pub async fn published_content(
    State(state): State<AppState>,
    Query(params): Query<PublishedParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.map(|l| clamp_page_size(Some(l)));
    let items = ContentService::published(&state.ctx, params.content_type, limit).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/content/featured
pub async fn featured_content(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_page_size(Some(params.limit.unwrap_or(FEATURED_LIMIT)));
    let items = ContentService::featured(&state.ctx, limit).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/content/live
pub async fn watch_content(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Query(filter): Query<ContentFilter>,
) -> AppResult<impl IntoResponse> {
    let subscription = ContentService::subscribe(&state.ctx, auth.caller().as_ref(), filter).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/content/{id}
pub async fn get_content(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let item = ContentService::get(&state.ctx, auth.caller().as_ref(), &id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// GET /api/v1/content/slug/{slug}
pub async fn get_content_by_slug(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let item = ContentService::get_by_slug(&state.ctx, auth.caller().as_ref(), &slug).await?;
    Ok(Json(DataResponse { data: item }))
}

// ---------------------------------------------------------------------------
// Engagement counters
// ---------------------------------------------------------------------------

/// POST /api/v1/content/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ContentService::increment(&state.ctx, &id, ContentCounter::Views).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/content/{id}/like
pub async fn record_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ContentService::increment(&state.ctx, &id, ContentCounter::Likes).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/content/{id}/share
pub async fn record_share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ContentService::increment(&state.ctx, &id, ContentCounter::Shares).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

/// POST /api/v1/content
///
/// The slug is derived from the title unless given, and must be unique.
pub async fn create_content(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateContent>,
) -> AppResult<impl IntoResponse> {
    let item = ContentService::create(&state.ctx, &admin.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/content/{id}
pub async fn update_content(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateContent>,
) -> AppResult<impl IntoResponse> {
    let item = ContentService::update(&state.ctx, &admin.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/content/{id}
pub async fn delete_content(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    ContentService::delete(&state.ctx, &admin.caller(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
