//! Collaboration requests submitted by artists and reviewed by admins.

use serde::Serialize;
use serde_json::json;

use beatstore_core::collaboration::{validate_amount, validate_notes, validate_title};
use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::status::{CollaborationStatus, PaymentStatus, RequestStatus};
use beatstore_db::models::collab_request::{
    CollabRequest, CreateCollabRequest, NewCollabRequest, ReviewRequest,
};
use beatstore_db::models::collaboration::{Collaboration, NewCollaboration};
use beatstore_db::repositories::{CollabRequestRepo, CollaborationRepo};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

/// An approved request and the collaboration opened for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedRequest {
    pub request: CollabRequest,
    pub collaboration: Collaboration,
}

pub struct CollabRequestService;

impl CollabRequestService {
    pub async fn submit(
        ctx: &ServiceContext,
        caller: &Caller,
        input: CreateCollabRequest,
    ) -> ServiceResult<CollabRequest> {
        caller.require_role(&[Role::Artist], "request collaborations")?;
        validate_title(&input.title).map_err(invalid)?;
        if input.description.trim().is_empty() {
            return Err(invalid("Description must not be empty".to_string()));
        }
        validate_notes(&input.description).map_err(invalid)?;
        if let Some(budget) = input.budget {
            validate_amount("Budget", budget).map_err(invalid)?;
        }

        let record = NewCollabRequest {
            artist_id: caller.user_id.clone(),
            artist_name: caller.label().to_string(),
            artist_email: caller.email.clone(),
            title: input.title,
            collaboration_type: input.collaboration_type,
            description: input.description,
            budget: input.budget,
            preferred_start_date: input.preferred_start_date,
            message: input.message,
            status: RequestStatus::Pending,
        };
        let request = CollabRequestRepo::create(ctx.store(), &record).await?;

        tracing::info!(request_id = %request.id, user_id = %caller.user_id, "Collaboration request submitted");
        ctx.publish(
            PlatformEvent::new(event_types::COLLAB_REQUEST_SUBMITTED)
                .with_source("collab_request", request.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "title": request.title })),
        );
        Ok(request)
    }

    pub async fn list(
        ctx: &ServiceContext,
        caller: &Caller,
        status: Option<RequestStatus>,
    ) -> ServiceResult<Vec<CollabRequest>> {
        caller.require_admin("list collaboration requests")?;
        Ok(CollabRequestRepo::list(ctx.store(), status, None).await?)
    }

    /// The calling artist's own requests.
    pub async fn list_mine(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Vec<CollabRequest>> {
        caller.require_role(&[Role::Artist], "view collaboration requests")?;
        Ok(CollabRequestRepo::list(ctx.store(), None, Some(&caller.user_id)).await?)
    }

    /// Approve a pending request and open a collaboration for it in
    /// `inquiry`, unpaid, assigned to the requesting artist.
    pub async fn approve(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        review: ReviewRequest,
    ) -> ServiceResult<ApprovedRequest> {
        caller.require_admin("approve collaboration requests")?;
        let pending = Self::find_pending(ctx, id).await?;

        let record = NewCollaboration {
            title: pending.title.clone(),
            collaboration_type: pending.collaboration_type,
            description: Some(pending.description.clone()),
            client_name: pending.artist_name.clone(),
            client_email: pending.artist_email.clone(),
            assigned_to: Some(pending.artist_id.clone()),
            budget: pending.budget.unwrap_or(0.0),
            paid_amount: 0.0,
            payment_status: PaymentStatus::Unpaid,
            status: CollaborationStatus::Inquiry,
            start_date: pending.preferred_start_date.clone(),
            deadline: None,
            notes: pending.message.clone(),
            attachments: Vec::new(),
            request_id: Some(pending.id.clone()),
        };
        let collaboration = CollaborationRepo::create(ctx.store(), &record).await?;
        let request = CollabRequestRepo::review(
            ctx.store(),
            id,
            RequestStatus::Approved,
            &caller.user_id,
            review.note.as_deref(),
            Some(&collaboration.id),
        )
        .await?
        .ok_or_else(|| CoreError::not_found("CollabRequest", id))?;

        tracing::info!(
            request_id = %id,
            collaboration_id = %collaboration.id,
            user_id = %caller.user_id,
            "Collaboration request approved"
        );
        Self::announce_review(ctx, caller, &request);
        Ok(ApprovedRequest {
            request,
            collaboration,
        })
    }

    pub async fn reject(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        review: ReviewRequest,
    ) -> ServiceResult<CollabRequest> {
        caller.require_admin("reject collaboration requests")?;
        Self::find_pending(ctx, id).await?;
        let request = CollabRequestRepo::review(
            ctx.store(),
            id,
            RequestStatus::Rejected,
            &caller.user_id,
            review.note.as_deref(),
            None,
        )
        .await?
        .ok_or_else(|| CoreError::not_found("CollabRequest", id))?;

        tracing::info!(request_id = %id, user_id = %caller.user_id, "Collaboration request rejected");
        Self::announce_review(ctx, caller, &request);
        Ok(request)
    }

    pub async fn delete(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<()> {
        caller.require_admin("delete collaboration requests")?;
        if !CollabRequestRepo::delete(ctx.store(), id).await? {
            return Err(CoreError::not_found("CollabRequest", id).into());
        }
        tracing::info!(request_id = %id, user_id = %caller.user_id, "Collaboration request deleted");
        Ok(())
    }

    async fn find_pending(ctx: &ServiceContext, id: &str) -> ServiceResult<CollabRequest> {
        let request = CollabRequestRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("CollabRequest", id))?;
        request.status.ensure_pending("Collaboration request")?;
        Ok(request)
    }

    fn announce_review(ctx: &ServiceContext, caller: &Caller, request: &CollabRequest) {
        ctx.publish(
            PlatformEvent::new(event_types::COLLAB_REQUEST_REVIEWED)
                .with_source("collab_request", request.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({
                    "artistId": request.artist_id,
                    "status": request.status,
                })),
        );
    }
}
