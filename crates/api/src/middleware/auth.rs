//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::types::DocId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Signed-in user extracted from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DocId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

impl AuthUser {
    /// The session context handed to services.
    pub fn caller(&self) -> Caller {
        let caller = Caller::new(self.user_id.clone(), self.email.clone(), self.role);
        match &self.display_name {
            Some(name) => caller.with_display_name(name.clone()),
            None => caller,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;
        authenticate(auth_header, state)
    }
}

/// Optional authentication for public endpoints that show more to admins.
///
/// No header yields `None`; a header with a bad token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn caller(&self) -> Option<Caller> {
        self.0.as_ref().map(AuthUser::caller)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some(header) => authenticate(header, state).map(|user| MaybeAuthUser(Some(user))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

fn authenticate(header: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;
    let role = Role::parse(&claims.role).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Token carries an unknown role".into()))
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        display_name: claims.name,
        role,
    })
}
