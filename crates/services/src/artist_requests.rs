//! Applications from customers to become artists.

use serde_json::json;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::status::RequestStatus;
use beatstore_db::models::artist_request::{
    ArtistRoleRequest, CreateArtistRoleRequest, NewArtistRoleRequest,
};
use beatstore_db::models::collab_request::ReviewRequest;
use beatstore_db::repositories::{ArtistRoleRequestRepo, UserRepo};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

const MAX_ARTIST_NAME_LENGTH: usize = 100;

pub struct ArtistRoleRequestService;

impl ArtistRoleRequestService {
    /// Submit an application. A customer may have one pending at a time.
    pub async fn submit(
        ctx: &ServiceContext,
        caller: &Caller,
        input: CreateArtistRoleRequest,
    ) -> ServiceResult<ArtistRoleRequest> {
        caller.require_role(&[Role::User], "apply for the artist role")?;
        let name = input.artist_name.trim();
        if name.is_empty() {
            return Err(invalid("Artist name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_ARTIST_NAME_LENGTH {
            return Err(invalid(format!(
                "Artist name must not exceed {MAX_ARTIST_NAME_LENGTH} characters"
            )));
        }
        if ArtistRoleRequestRepo::find_pending_for_user(ctx.store(), &caller.user_id)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict("An application is already pending".to_string()).into());
        }

        let record = NewArtistRoleRequest {
            user_id: caller.user_id.clone(),
            user_email: caller.email.clone(),
            user_name: caller.display_name.clone(),
            artist_name: name.to_string(),
            region: input.region,
            city: input.city,
            roles: input.roles,
            instagram: input.instagram,
            spotify: input.spotify,
            additional_info: input.additional_info,
            status: RequestStatus::Pending,
        };
        let request = ArtistRoleRequestRepo::create(ctx.store(), &record).await?;

        tracing::info!(request_id = %request.id, user_id = %caller.user_id, "Artist role requested");
        ctx.publish(
            PlatformEvent::new(event_types::ARTIST_REQUEST_SUBMITTED)
                .with_source("artist_request", request.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "artistName": request.artist_name })),
        );
        Ok(request)
    }

    pub async fn list(
        ctx: &ServiceContext,
        caller: &Caller,
        status: Option<RequestStatus>,
    ) -> ServiceResult<Vec<ArtistRoleRequest>> {
        caller.require_admin("list artist applications")?;
        Ok(ArtistRoleRequestRepo::list(ctx.store(), status).await?)
    }

    /// The caller's own applications, newest first.
    pub async fn list_mine(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Vec<ArtistRoleRequest>> {
        Ok(ArtistRoleRequestRepo::list_for_user(ctx.store(), &caller.user_id).await?)
    }

    /// Approve a pending application and promote the applicant to artist.
    pub async fn approve(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        review: ReviewRequest,
    ) -> ServiceResult<ArtistRoleRequest> {
        caller.require_admin("approve artist applications")?;
        let pending = Self::find_pending(ctx, id).await?;

        UserRepo::update_role(ctx.store(), &pending.user_id, Role::Artist)
            .await?
            .ok_or_else(|| CoreError::not_found("User", pending.user_id.clone()))?;
        let request = Self::review(ctx, caller, id, RequestStatus::Approved, review).await?;

        tracing::info!(request_id = %id, user_id = %pending.user_id, "Artist role granted");
        ctx.publish(
            PlatformEvent::new(event_types::USER_ROLE_CHANGED)
                .with_source("user", pending.user_id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "role": Role::Artist })),
        );
        Ok(request)
    }

    pub async fn reject(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        review: ReviewRequest,
    ) -> ServiceResult<ArtistRoleRequest> {
        caller.require_admin("reject artist applications")?;
        Self::find_pending(ctx, id).await?;
        let request = Self::review(ctx, caller, id, RequestStatus::Rejected, review).await?;
        tracing::info!(request_id = %id, "Artist role request rejected");
        Ok(request)
    }

    async fn find_pending(ctx: &ServiceContext, id: &str) -> ServiceResult<ArtistRoleRequest> {
        let request = ArtistRoleRequestRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("ArtistRoleRequest", id))?;
        request.status.ensure_pending("Artist role request")?;
        Ok(request)
    }

    async fn review(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        status: RequestStatus,
        review: ReviewRequest,
    ) -> ServiceResult<ArtistRoleRequest> {
        let request = ArtistRoleRequestRepo::review(
            ctx.store(),
            id,
            status,
            &caller.user_id,
            review.note.as_deref(),
        )
        .await?
        .ok_or_else(|| CoreError::not_found("ArtistRoleRequest", id))?;
        ctx.publish(
            PlatformEvent::new(event_types::ARTIST_REQUEST_REVIEWED)
                .with_source("artist_request", request.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "userId": request.user_id, "status": request.status })),
        );
        Ok(request)
    }
}
