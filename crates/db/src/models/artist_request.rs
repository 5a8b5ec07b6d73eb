//! Requests from customers to become artists.

use serde::{Deserialize, Serialize};

use beatstore_core::status::RequestStatus;
use beatstore_core::types::{DocId, Timestamp};

/// A document from the `artistRoleRequests` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRoleRequest {
    #[serde(default)]
    pub id: DocId,
    pub user_id: DocId,
    pub user_email: String,
    pub user_name: Option<String>,
    pub artist_name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    /// Self-described roles, e.g. producer or vocalist.
    #[serde(default)]
    pub roles: Vec<String>,
    pub instagram: Option<String>,
    pub spotify: Option<String>,
    pub additional_info: Option<String>,
    pub status: RequestStatus,
    pub reviewed_by: Option<DocId>,
    pub review_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting an application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtistRoleRequest {
    pub artist_name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub instagram: Option<String>,
    pub spotify: Option<String>,
    pub additional_info: Option<String>,
}

/// Stored shape of a new application.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtistRoleRequest {
    pub user_id: DocId,
    pub user_email: String,
    pub user_name: Option<String>,
    pub artist_name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub roles: Vec<String>,
    pub instagram: Option<String>,
    pub spotify: Option<String>,
    pub additional_info: Option<String>,
    pub status: RequestStatus,
}
