//! User profiles and the auth records kept alongside them.

use serde::{Deserialize, Serialize};

use beatstore_core::roles::Role;
use beatstore_core::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// A document from the `users` collection. The document id is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: DocId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// Stored shape of a new profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
}

/// DTO for a profile edit by its owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// DTO for an admin role change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRole {
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A document from the `credentials` collection, keyed by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(default)]
    pub id: DocId,
    /// Lowercased, used for sign-in lookup.
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub failed_login_count: u32,
    pub locked_until: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub email: String,
    pub password_hash: String,
    pub failed_login_count: u32,
}

// ---------------------------------------------------------------------------
// Refresh sessions
// ---------------------------------------------------------------------------

/// A document from the `sessions` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSession {
    #[serde(default)]
    pub id: DocId,
    pub user_id: DocId,
    /// SHA-256 hex of the refresh token.
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRefreshSession {
    pub user_id: DocId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Password resets
// ---------------------------------------------------------------------------

/// A document from the `passwordResets` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    #[serde(default)]
    pub id: DocId,
    pub user_id: DocId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    #[serde(default)]
    pub used: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordReset {
    pub user_id: DocId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used: bool,
}
