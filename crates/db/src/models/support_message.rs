//! Support chat messages.

use serde::{Deserialize, Serialize};

use beatstore_core::chat::ChatEnvelope;
use beatstore_core::roles::Role;
use beatstore_core::types::{DocId, Timestamp};

/// A document from the `supportMessages` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    #[serde(default)]
    pub id: DocId,
    pub sender_id: DocId,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_role: Role,
    /// Set on admin replies; absent on messages to support.
    pub recipient_id: Option<DocId>,
    pub message: String,
    pub created_at: Timestamp,
}

/// Stored shape of a new message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupportMessage {
    pub sender_id: DocId,
    pub sender_name: String,
    pub sender_email: String,
    pub sender_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<DocId>,
    pub message: String,
}

/// DTO for sending a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub message: String,
    /// Required when an admin replies.
    pub recipient_id: Option<DocId>,
}

impl ChatEnvelope for SupportMessage {
    fn sender_id(&self) -> &str {
        &self.sender_id
    }

    fn sender_name(&self) -> &str {
        &self.sender_name
    }

    fn sender_email(&self) -> &str {
        &self.sender_email
    }

    fn sender_role(&self) -> Role {
        self.sender_role
    }

    fn recipient_id(&self) -> Option<&str> {
        self.recipient_id.as_deref()
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
