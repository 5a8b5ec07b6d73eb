//! Handlers for the `/auth` resource: sign-up, sign-in, token refresh,
//! sign-out, the current session and password management.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use beatstore_core::error::CoreError;
use beatstore_core::roles::DEFAULT_ROLE;
use beatstore_core::session::Caller;
use beatstore_core::types::{format_timestamp, new_doc_id};
use beatstore_db::models::user::{
    NewCredential, NewPasswordReset, NewRefreshSession, NewUser, UpdateProfile, User,
};
use beatstore_db::repositories::{CredentialRepo, PasswordResetRepo, SessionRepo, UserRepo};
use beatstore_events::{event_types, PlatformEvent};
use beatstore_services::UserService;

use crate::auth::jwt::{generate_access_token, generate_opaque_token, hash_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Consecutive failed sign-ins before the account locks.
const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Minutes an account stays locked.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/password-reset`.
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Request body for `POST /auth/password-reset/confirm`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Request body for `PUT /auth/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Tokens plus the signed-in profile, returned by sign-up, sign-in and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
    /// Where the client should land after sign-in.
    pub dashboard_route: &'static str,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub dashboard_route: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Create an account with the default customer role and sign it in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate().map_err(validation_error)?;
    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let email = input.email.trim().to_lowercase();
    if CredentialRepo::find_by_email(state.store(), &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user_id = new_doc_id();
    let user = UserRepo::create(
        state.store(),
        &user_id,
        &NewUser {
            email: email.clone(),
            display_name: input.display_name.map(|n| n.trim().to_string()),
            photo_url: None,
            role: DEFAULT_ROLE,
        },
    )
    .await?;
    CredentialRepo::create(
        state.store(),
        &user_id,
        &NewCredential {
            email,
            password_hash,
            failed_login_count: 0,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User signed up");
    state.ctx.publish(
        PlatformEvent::new(event_types::USER_SIGNED_UP)
            .with_source("user", user.id.clone())
            .with_actor(user.id.clone())
            .with_payload(json!({ "email": user.email })),
    );

    let response = create_auth_response(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/sign-in
///
/// Authenticate with email + password. Repeated failures lock the account.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let credential = CredentialRepo::find_by_email(state.store(), &input.email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    let now = Utc::now();
    if credential.locked_until.is_some_and(|until| until > now) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &credential.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // A lock that has run out starts a fresh count.
        let previous = if credential.locked_until.is_some() {
            0
        } else {
            credential.failed_login_count
        };
        let failed = previous + 1;
        let locked_until = (failed >= MAX_FAILED_ATTEMPTS)
            .then(|| format_timestamp(now + Duration::minutes(LOCK_DURATION_MINS)));
        CredentialRepo::record_failed_login(state.store(), &credential.id, failed, locked_until.as_deref())
            .await?;
        if locked_until.is_some() {
            tracing::warn!(user_id = %credential.id, failed, "Account locked after failed sign-ins");
        }
        return Err(AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())));
    }

    CredentialRepo::reset_failed_logins(state.store(), &credential.id).await?;
    let user = UserRepo::touch_last_login(state.store(), &credential.id, &format_timestamp(now))
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
    Ok(Json(create_auth_response(&state, user).await?))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for new tokens. The old session is revoked and
/// the role is re-read, so role changes apply from here on.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_token(&input.refresh_token);
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let session = SessionRepo::find_by_token_hash(state.store(), &token_hash)
        .await?
        .ok_or_else(invalid)?;
    SessionRepo::delete(state.store(), &session.id).await?;
    if session.expires_at <= Utc::now() {
        return Err(invalid());
    }

    let user = UserRepo::find_by_id(state.store(), &session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(create_auth_response(&state, user).await?))
}

/// POST /api/v1/auth/sign-out
///
/// Revoke every session of the signed-in user. Returns 204 No Content.
pub async fn sign_out(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    let removed = SessionRepo::delete_for_user(state.store(), &user.user_id).await?;
    tracing::info!(user_id = %user.user_id, removed, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The signed-in profile and the dashboard its role lands on.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<SessionInfo>>> {
    let profile = UserService::get(&state.ctx, &user.caller(), &user.user_id).await?;
    let dashboard_route = profile.role.dashboard_route();
    Ok(Json(DataResponse {
        data: SessionInfo {
            user: profile,
            dashboard_route,
        },
    }))
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<User>>> {
    let profile = UserService::update_profile(&state.ctx, &user.caller(), &user.user_id, input).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/v1/auth/password-reset
///
/// Start a password reset. Always answers 202 so the endpoint does not reveal
/// which emails have accounts.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetRequest>,
) -> AppResult<StatusCode> {
    input.validate().map_err(validation_error)?;

    let Some(credential) = CredentialRepo::find_by_email(state.store(), &input.email).await? else {
        tracing::info!("Password reset requested for unknown email");
        return Ok(StatusCode::ACCEPTED);
    };

    let (token, token_hash) = generate_opaque_token();
    let expiry_mins = state.config.password_reset_expiry_mins;
    PasswordResetRepo::create(
        state.store(),
        &NewPasswordReset {
            user_id: credential.id.clone(),
            token_hash,
            expires_at: Utc::now() + Duration::minutes(expiry_mins),
            used: false,
        },
    )
    .await?;

    tracing::info!(user_id = %credential.id, "Password reset requested");
    state.ctx.publish(
        PlatformEvent::new(event_types::PASSWORD_RESET_REQUESTED)
            .with_source("user", credential.id.clone())
            .with_payload(json!({
                "email": credential.email,
                "resetToken": token,
                "expiresInMinutes": expiry_mins,
            })),
    );
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/password-reset/confirm
///
/// Set a new password with a reset token. Tokens are single use and every
/// session of the user is revoked.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(input): Json<PasswordResetConfirm>,
) -> AppResult<StatusCode> {
    let invalid = || AppError::Core(CoreError::Validation("Invalid or expired reset token".into()));

    let reset = PasswordResetRepo::find_by_token_hash(state.store(), &hash_token(&input.token))
        .await?
        .ok_or_else(invalid)?;
    if reset.used || reset.expires_at <= Utc::now() {
        return Err(invalid());
    }
    validate_password_strength(&input.new_password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    set_password(&state, &reset.user_id, &input.new_password).await?;
    PasswordResetRepo::mark_used(state.store(), &reset.id).await?;
    SessionRepo::delete_for_user(state.store(), &reset.user_id).await?;

    tracing::info!(user_id = %reset.user_id, "Password reset completed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/auth/password
///
/// Change the password of the signed-in user.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let credential = CredentialRepo::find_by_user(state.store(), &user.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Credential", user.user_id.clone()))?;

    let current_valid = verify_password(&input.current_password, &credential.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }
    validate_password_strength(&input.new_password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    set_password(&state, &user.user_id, &input.new_password).await?;
    tracing::info!(user_id = %user.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn set_password(state: &AppState, user_id: &str, password: &str) -> AppResult<()> {
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !CredentialRepo::update_password_hash(state.store(), user_id, &password_hash).await? {
        return Err(CoreError::not_found("Credential", user_id).into());
    }
    Ok(())
}

/// Issue tokens for `user`, persist the refresh session and build the response.
async fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let caller = caller_for(&user);
    let access_token = generate_access_token(&caller, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, token_hash) = generate_opaque_token();
    SessionRepo::create(
        state.store(),
        &NewRefreshSession {
            user_id: user.id.clone(),
            token_hash,
            expires_at: Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        dashboard_route: user.role.dashboard_route(),
        user,
    })
}

fn caller_for(user: &User) -> Caller {
    let caller = Caller::new(user.id.clone(), user.email.clone(), user.role);
    match &user.display_name {
        Some(name) => caller.with_display_name(name.clone()),
        None => caller,
    }
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(errors.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatstore_core::roles::Role;

    #[test]
    fn sign_up_validation() {
        let ok = SignUpRequest {
            email: "fan@example.com".into(),
            password: "long-enough".into(),
            display_name: Some("Fan".into()),
        };
        assert!(ok.validate().is_ok());

        let bad = SignUpRequest {
            email: "not-an-email".into(),
            password: "long-enough".into(),
            display_name: Some(String::new()),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("display_name"));
    }

    #[test]
    fn caller_carries_profile() {
        let user = User {
            id: "u1".into(),
            email: "a@example.com".into(),
            display_name: Some("A".into()),
            photo_url: None,
            role: Role::Artist,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };
        let caller = caller_for(&user);
        assert_eq!(caller.role, Role::Artist);
        assert_eq!(caller.label(), "A");
    }
}
