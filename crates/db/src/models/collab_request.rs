//! Collaboration requests submitted by artists.

use serde::{Deserialize, Serialize};

use beatstore_core::status::{CollaborationType, RequestStatus};
use beatstore_core::types::{Amount, DocId, Timestamp};

/// A document from the `collabRequests` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabRequest {
    #[serde(default)]
    pub id: DocId,
    pub artist_id: DocId,
    pub artist_name: String,
    pub artist_email: String,
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: String,
    pub budget: Option<Amount>,
    pub preferred_start_date: Option<String>,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub reviewed_by: Option<DocId>,
    pub review_note: Option<String>,
    /// Set once approved.
    pub collaboration_id: Option<DocId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollabRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: String,
    pub budget: Option<Amount>,
    pub preferred_start_date: Option<String>,
    pub message: Option<String>,
}

/// Stored shape of a new request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollabRequest {
    pub artist_id: DocId,
    pub artist_name: String,
    pub artist_email: String,
    pub title: String,
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
    pub description: String,
    pub budget: Option<Amount>,
    pub preferred_start_date: Option<String>,
    pub message: Option<String>,
    pub status: RequestStatus,
}

/// Reviewer decision payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub note: Option<String>,
}
