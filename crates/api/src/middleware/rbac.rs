//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement. Services check roles again; these give routes an
//! early, self-documenting rejection.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `artist` or `admin`. Rejects with 403 Forbidden otherwise.
pub struct RequireArtist(pub AuthUser);

impl FromRequestParts<AppState> for RequireArtist {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !matches!(user.role, Role::Artist | Role::Admin) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Artist or Admin role required".into(),
            )));
        }
        Ok(RequireArtist(user))
    }
}

/// Requires any signed-in user.
///
/// Equivalent to [`AuthUser`], named for route definitions where "this route
/// requires authentication" should read explicitly.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
