//! Collaboration pipeline: bookings for videos, shows and sessions.

use chrono::Utc;
use serde_json::json;

use beatstore_core::collaboration::{
    payment_status, validate_amount, validate_notes, validate_title, validate_transition,
};
use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::settings::looks_like_email;
use beatstore_core::statistics::{collaboration_statistics, CollaborationStatistics};
use beatstore_core::status::{CollaborationStatus, PaymentStatus};
use beatstore_core::types::Amount;
use beatstore_db::collections::COLLABORATIONS;
use beatstore_db::models::collaboration::{
    Collaboration, CollaborationFilter, CreateCollaboration, NewCollaboration, UpdateCollaboration,
};
use beatstore_db::repositories::CollaborationRepo;
use beatstore_db::{LiveQuery, Subscription};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

pub struct CollaborationService;

impl CollaborationService {
    pub async fn list(
        ctx: &ServiceContext,
        caller: &Caller,
        filter: &CollaborationFilter,
    ) -> ServiceResult<Vec<Collaboration>> {
        caller.require_admin("list collaborations")?;
        Ok(CollaborationRepo::list(ctx.store(), filter).await?)
    }

    /// Collaborations assigned to the calling artist or addressed to their email.
    pub async fn list_for_artist(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Vec<Collaboration>> {
        caller.require_role(&[Role::Artist, Role::Admin], "view artist collaborations")?;
        Ok(CollaborationRepo::list_for_artist(ctx.store(), &caller.user_id, &caller.email).await?)
    }

    /// One collaboration, for an admin or the artist involved.
    pub async fn get(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<Collaboration> {
        caller.require_role(&[Role::Artist, Role::Admin], "view collaborations")?;
        let collab = CollaborationRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;
        if !caller.is_admin() && !involves(&collab, caller) {
            return Err(CoreError::not_found("Collaboration", id).into());
        }
        Ok(collab)
    }

    pub async fn create(
        ctx: &ServiceContext,
        caller: &Caller,
        input: CreateCollaboration,
    ) -> ServiceResult<Collaboration> {
        caller.require_admin("create collaborations")?;
        validate_title(&input.title).map_err(invalid)?;
        validate_client(&input.client_name, &input.client_email)?;
        validate_amount("Budget", input.budget).map_err(invalid)?;
        if let Some(notes) = &input.notes {
            validate_notes(notes).map_err(invalid)?;
        }

        let record = NewCollaboration {
            title: input.title,
            collaboration_type: input.collaboration_type,
            description: input.description,
            client_name: input.client_name,
            client_email: input.client_email,
            assigned_to: input.assigned_to,
            budget: input.budget,
            paid_amount: 0.0,
            payment_status: PaymentStatus::Unpaid,
            status: input.status.unwrap_or(CollaborationStatus::Inquiry),
            start_date: input.start_date,
            deadline: input.deadline,
            notes: input.notes,
            attachments: Vec::new(),
            request_id: None,
        };
        let collab = CollaborationRepo::create(ctx.store(), &record).await?;

        tracing::info!(collaboration_id = %collab.id, user_id = %caller.user_id, "Collaboration created");
        ctx.publish(
            PlatformEvent::new(event_types::COLLABORATION_CREATED)
                .with_source("collaboration", collab.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "title": collab.title })),
        );
        Ok(collab)
    }

    /// Edit details. A budget change re-derives the payment status.
    pub async fn update(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateCollaboration,
    ) -> ServiceResult<Collaboration> {
        caller.require_admin("update collaborations")?;
        if let Some(title) = &input.title {
            validate_title(title).map_err(invalid)?;
        }
        if let Some(email) = &input.client_email {
            if !looks_like_email(email) {
                return Err(invalid(format!("Invalid client email '{email}'")));
            }
        }
        if let Some(budget) = input.budget {
            validate_amount("Budget", budget).map_err(invalid)?;
        }
        if let Some(notes) = &input.notes {
            validate_notes(notes).map_err(invalid)?;
        }

        let existing = CollaborationRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;
        let derived = input.budget.map(|budget| payment_status(budget, existing.paid_amount));

        let collab = CollaborationRepo::update(ctx.store(), id, &input, derived)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;
        tracing::info!(collaboration_id = %id, user_id = %caller.user_id, "Collaboration updated");
        Ok(collab)
    }

    /// Move through the pipeline. Completing stamps the end date.
    pub async fn transition(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        status: CollaborationStatus,
    ) -> ServiceResult<Collaboration> {
        caller.require_admin("change collaboration status")?;
        let existing = CollaborationRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;
        validate_transition(existing.status, status)?;

        let end_date = (status == CollaborationStatus::Completed && existing.end_date.is_none())
            .then(|| Utc::now().format("%Y-%m-%d").to_string());
        let collab = CollaborationRepo::set_status(ctx.store(), id, status, end_date.as_deref())
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;

        tracing::info!(
            collaboration_id = %id,
            from = %existing.status,
            to = %status,
            user_id = %caller.user_id,
            "Collaboration status changed"
        );
        ctx.publish(
            PlatformEvent::new(event_types::COLLABORATION_STATUS_CHANGED)
                .with_source("collaboration", collab.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({
                    "title": collab.title,
                    "clientEmail": collab.client_email,
                    "from": existing.status,
                    "status": collab.status,
                })),
        );
        Ok(collab)
    }

    /// Add a received payment and re-derive the payment status.
    pub async fn record_payment(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        amount: Amount,
    ) -> ServiceResult<Collaboration> {
        caller.require_admin("record payments")?;
        validate_amount("Amount", amount).map_err(invalid)?;
        if amount == 0.0 {
            return Err(invalid("Amount must be greater than zero".to_string()));
        }
        let existing = CollaborationRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;
        if existing.status == CollaborationStatus::Cancelled {
            return Err(CoreError::Conflict("Collaboration is cancelled".to_string()).into());
        }

        let paid = existing.paid_amount + amount;
        let status = payment_status(existing.budget, paid);
        let collab = CollaborationRepo::set_payment(ctx.store(), id, paid, status)
            .await?
            .ok_or_else(|| CoreError::not_found("Collaboration", id))?;

        tracing::info!(collaboration_id = %id, amount, paid, payment_status = %status, "Payment recorded");
        ctx.publish(
            PlatformEvent::new(event_types::COLLABORATION_PAYMENT_RECORDED)
                .with_source("collaboration", collab.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "amount": amount, "paidAmount": paid, "paymentStatus": status })),
        );
        Ok(collab)
    }

    pub async fn delete(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<()> {
        caller.require_admin("delete collaborations")?;
        if !CollaborationRepo::delete(ctx.store(), id).await? {
            return Err(CoreError::not_found("Collaboration", id).into());
        }
        tracing::info!(collaboration_id = %id, user_id = %caller.user_id, "Collaboration deleted");
        Ok(())
    }

    pub async fn stats(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<CollaborationStatistics> {
        caller.require_admin("view collaboration statistics")?;
        let all = CollaborationRepo::list_all(ctx.store()).await?;
        Ok(collaboration_statistics(
            all.iter().map(|c| (c.status, c.budget, c.paid_amount)),
        ))
    }

    pub async fn subscribe(
        ctx: &ServiceContext,
        caller: &Caller,
        filter: &CollaborationFilter,
    ) -> ServiceResult<Subscription> {
        caller.require_admin("watch collaborations")?;
        let query = CollaborationRepo::filter_query(filter);
        Ok(LiveQuery::new(COLLABORATIONS, query).start(ctx.store.clone()).await?)
    }

    pub async fn subscribe_for_artist(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Subscription> {
        caller.require_role(&[Role::Artist, Role::Admin], "watch artist collaborations")?;
        let query = CollaborationRepo::artist_query(&caller.user_id, &caller.email);
        Ok(LiveQuery::new(COLLABORATIONS, query).start(ctx.store.clone()).await?)
    }
}

fn involves(collab: &Collaboration, caller: &Caller) -> bool {
    collab.assigned_to.as_deref() == Some(caller.user_id.as_str()) || collab.client_email == caller.email
}

fn validate_client(name: &str, email: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(invalid("Client name must not be empty".to_string()));
    }
    if !looks_like_email(email) {
        return Err(invalid(format!("Invalid client email '{email}'")));
    }
    Ok(())
}
