//! Support chat between customers or artists and the admin team.

use serde_json::json;

use beatstore_core::chat::{build_conversations, in_thread, validate_message, Conversation, DEFAULT_ADMIN_NAME};
use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_db::collections::SUPPORT_MESSAGES;
use beatstore_db::models::support_message::{NewSupportMessage, SendMessage, SupportMessage};
use beatstore_db::repositories::{SupportMessageRepo, UserRepo};
use beatstore_db::{LiveQuery, Subscription};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

pub struct ChatService;

impl ChatService {
    /// Send a message. Customers and artists always write to support; admins
    /// must name the user they are replying to.
    pub async fn send(ctx: &ServiceContext, caller: &Caller, input: SendMessage) -> ServiceResult<SupportMessage> {
        validate_message(&input.message).map_err(invalid)?;

        let recipient_id = if caller.is_admin() {
            let recipient = input
                .recipient_id
                .ok_or_else(|| invalid("Admin messages need a recipientId".to_string()))?;
            UserRepo::find_by_id(ctx.store(), &recipient)
                .await?
                .ok_or_else(|| CoreError::not_found("User", recipient.clone()))?;
            Some(recipient)
        } else {
            None
        };
        let sender_name = match (caller.role, caller.display_name.as_deref()) {
            (Role::Admin, None) => DEFAULT_ADMIN_NAME.to_string(),
            _ => caller.label().to_string(),
        };

        let record = NewSupportMessage {
            sender_id: caller.user_id.clone(),
            sender_name,
            sender_email: caller.email.clone(),
            sender_role: caller.role,
            recipient_id,
            message: input.message.trim().to_string(),
        };
        let message = SupportMessageRepo::create(ctx.store(), &record).await?;

        tracing::info!(message_id = %message.id, user_id = %caller.user_id, "Support message sent");
        ctx.publish(
            PlatformEvent::new(event_types::SUPPORT_MESSAGE_SENT)
                .with_source("support_message", message.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "recipientId": message.recipient_id })),
        );
        Ok(message)
    }

    /// Admin inbox: one conversation per non-admin sender, newest first.
    pub async fn conversations(
        ctx: &ServiceContext,
        caller: &Caller,
        role: Option<Role>,
        search: Option<&str>,
    ) -> ServiceResult<Vec<Conversation>> {
        caller.require_admin("read the support inbox")?;
        let messages = SupportMessageRepo::list_all(ctx.store()).await?;
        Ok(build_conversations(&messages, role, search))
    }

    /// A user's thread with support, oldest first.
    pub async fn thread(ctx: &ServiceContext, caller: &Caller, user_id: &str) -> ServiceResult<Vec<SupportMessage>> {
        caller.require_owner_or_admin(user_id, "read this conversation")?;
        Ok(SupportMessageRepo::thread(ctx.store(), user_id).await?)
    }

    /// Live inbox over every message, newest first.
    pub async fn subscribe_inbox(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Subscription> {
        caller.require_admin("watch the support inbox")?;
        Ok(LiveQuery::new(SUPPORT_MESSAGES, SupportMessageRepo::all_query())
            .start(ctx.store.clone())
            .await?)
    }

    /// Live thread of one user.
    pub async fn subscribe_thread(ctx: &ServiceContext, caller: &Caller, user_id: &str) -> ServiceResult<Subscription> {
        caller.require_owner_or_admin(user_id, "watch this conversation")?;
        let owner = user_id.to_string();
        Ok(LiveQuery::new(SUPPORT_MESSAGES, SupportMessageRepo::thread_query(user_id))
            .filter(move |doc| {
                doc.decode::<SupportMessage>()
                    .is_ok_and(|m| in_thread(&m, &owner))
            })
            .start(ctx.store.clone())
            .await?)
    }
}
