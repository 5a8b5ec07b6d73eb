//! Handlers for the `/users` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use beatstore_db::models::user::{UpdateProfile, UpdateUserRole};
use beatstore_services::UserService;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::RoleParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// All profiles, optionally narrowed to one `role`.
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<RoleParams>,
) -> AppResult<impl IntoResponse> {
    let users = UserService::list(&state.ctx, &admin.caller(), params.role).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::get(&state.ctx, &auth.caller(), &id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::update_profile(&state.ctx, &auth.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}/role
pub async fn update_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRole>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::update_role(&state.ctx, &admin.caller(), &id, input.role).await?;
    Ok(Json(DataResponse { data: user }))
}
