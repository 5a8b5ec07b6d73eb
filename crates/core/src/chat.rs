//! Support chat threading.
//!
//! Messages are flat documents. Customers and artists write to support with
//! no recipient; admins reply to a specific user. The admin inbox groups the
//! non-admin senders into conversations.

use std::collections::HashMap;

use serde::Serialize;

use crate::roles::Role;
use crate::types::Timestamp;

pub const MAX_MESSAGE_LENGTH: usize = 5_000;

/// Sender name used for admin replies when the admin has no display name.
pub const DEFAULT_ADMIN_NAME: &str = "Admin";

/// Read access to a stored chat message.
pub trait ChatEnvelope {
    fn sender_id(&self) -> &str;
    fn sender_name(&self) -> &str;
    fn sender_email(&self) -> &str;
    fn sender_role(&self) -> Role;
    fn recipient_id(&self) -> Option<&str>;
    fn message(&self) -> &str;
    fn created_at(&self) -> Timestamp;
}

/// One row of the admin inbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_role: Role,
    pub last_message: String,
    pub last_message_at: Timestamp,
    pub message_count: u64,
}

/// Group messages by non-admin sender, newest conversation first.
///
/// `role` keeps only conversations with that sender role; `search` matches
/// name, email or last message case-insensitively.
pub fn build_conversations<T: ChatEnvelope>(
    messages: &[T],
    role: Option<Role>,
    search: Option<&str>,
) -> Vec<Conversation> {
    let mut by_user: HashMap<&str, Conversation> = HashMap::new();
    for msg in messages.iter().filter(|m| m.sender_role() != Role::Admin) {
        let entry = by_user.entry(msg.sender_id()).or_insert_with(|| Conversation {
            user_id: msg.sender_id().to_string(),
            user_name: msg.sender_name().to_string(),
            user_email: msg.sender_email().to_string(),
            user_role: msg.sender_role(),
            last_message: msg.message().to_string(),
            last_message_at: msg.created_at(),
            message_count: 0,
        });
        entry.message_count += 1;
        if msg.created_at() > entry.last_message_at {
            entry.last_message = msg.message().to_string();
            entry.last_message_at = msg.created_at();
        }
    }

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut conversations: Vec<Conversation> = by_user
        .into_values()
        .filter(|c| role.is_none_or(|r| c.user_role == r))
        .filter(|c| match &needle {
            Some(n) => {
                c.user_name.to_lowercase().contains(n)
                    || c.user_email.to_lowercase().contains(n)
                    || c.last_message.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect();
    conversations.sort_by(|a, b| {
        b.last_message_at
            .cmp(&a.last_message_at)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    conversations
}

/// Whether `msg` belongs to the support thread of `user_id`.
pub fn in_thread<T: ChatEnvelope + ?Sized>(msg: &T, user_id: &str) -> bool {
    msg.sender_id() == user_id
        || (msg.recipient_id() == Some(user_id) && msg.sender_role() == Role::Admin)
}

/// The thread of one user, oldest first.
pub fn thread_for<'a, T: ChatEnvelope>(messages: &'a [T], user_id: &str) -> Vec<&'a T> {
    let mut thread: Vec<&T> = messages.iter().filter(|m| in_thread(*m, user_id)).collect();
    thread.sort_by_key(|m| m.created_at());
    thread
}

pub fn validate_message(message: &str) -> Result<(), String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err("Message must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message must not exceed {MAX_MESSAGE_LENGTH} characters"
        ));
    }
    Ok(())
}
