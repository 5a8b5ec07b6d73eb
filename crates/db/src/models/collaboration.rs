//! Collaboration model and DTOs.

use serde::{Deserialize, Serialize};

use beatstore_core::status::{CollaborationStatus, CollaborationType, PaymentStatus};
use beatstore_core::types::{Amount, DocId, Timestamp};

/// A document from the `collaborations` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    #[serde(default)]
    pub id: DocId,
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: Option<String>,
    pub client_name: String,
    pub client_email: String,
    /// User id of the artist doing the work.
    pub assigned_to: Option<DocId>,
    #[serde(default)]
    pub budget: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    pub payment_status: PaymentStatus,
    pub status: CollaborationStatus,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub end_date: Option<String>,
    pub contract_pdf: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub notes: Option<String>,
    /// Collab request this collaboration was created from.
    pub request_id: Option<DocId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a collaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollaboration {
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub assigned_to: Option<DocId>,
    #[serde(default)]
    pub budget: Amount,
    pub status: Option<CollaborationStatus>,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub notes: Option<String>,
}

/// Stored shape of a new collaboration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollaboration {
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: Option<String>,
    pub client_name: String,
    pub client_email: String,
    pub assigned_to: Option<DocId>,
    pub budget: Amount,
    pub paid_amount: Amount,
    pub payment_status: PaymentStatus,
    pub status: CollaborationStatus,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
    pub request_id: Option<DocId>,
}

/// DTO for editing collaboration details. Status and payments have their own
/// operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollaboration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub collaboration_type: Option<CollaborationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<DocId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionCollaboration {
    pub status: CollaborationStatus,
}

/// A payment received against the budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayment {
    pub amount: Amount,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationFilter {
    pub status: Option<CollaborationStatus>,
    #[serde(rename = "type")]
    pub collaboration_type: Option<CollaborationType>,
    pub payment_status: Option<PaymentStatus>,
    pub assigned_to: Option<DocId>,
}
