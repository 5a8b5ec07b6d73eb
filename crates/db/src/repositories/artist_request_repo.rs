//! Repository for the `artistRoleRequests` collection.

use serde_json::Value;

use beatstore_core::status::RequestStatus;

use crate::collections::ARTIST_ROLE_REQUESTS;
use crate::document::{decode_all, encode, Fields};
use crate::error::StoreError;
use crate::models::artist_request::{ArtistRoleRequest, NewArtistRoleRequest};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Provides CRUD operations for artist role applications.
pub struct ArtistRoleRequestRepo;

impl ArtistRoleRequestRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewArtistRoleRequest,
    ) -> Result<ArtistRoleRequest, StoreError> {
        store.insert(ARTIST_ROLE_REQUESTS, encode(input)?).await?.decode()
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<ArtistRoleRequest>, StoreError> {
        store
            .get(ARTIST_ROLE_REQUESTS, id)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn list(
        store: &dyn DocumentStore,
        status: Option<RequestStatus>,
    ) -> Result<Vec<ArtistRoleRequest>, StoreError> {
        let query = Query::new()
            .where_eq_opt("status", status.map(|s| s.as_str()))
            .order_by("createdAt", Direction::Desc);
        decode_all(&store.query(ARTIST_ROLE_REQUESTS, &query).await?)
    }

    /// The user's open application, if any.
    pub async fn find_pending_for_user(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<Option<ArtistRoleRequest>, StoreError> {
        let query = Query::new()
            .where_eq("userId", user_id)
            .where_eq("status", RequestStatus::Pending.as_str())
            .limit(1);
        store
            .query(ARTIST_ROLE_REQUESTS, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn list_for_user(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<Vec<ArtistRoleRequest>, StoreError> {
        let query = Query::new()
            .where_eq("userId", user_id)
            .order_by("createdAt", Direction::Desc);
        decode_all(&store.query(ARTIST_ROLE_REQUESTS, &query).await?)
    }

    pub async fn review(
        store: &dyn DocumentStore,
        id: &str,
        status: RequestStatus,
        reviewer_id: &str,
        note: Option<&str>,
    ) -> Result<Option<ArtistRoleRequest>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("status".into(), Value::String(status.as_str().to_string()));
        patch.insert("reviewedBy".into(), Value::String(reviewer_id.to_string()));
        if let Some(note) = note {
            patch.insert("reviewNote".into(), Value::String(note.to_string()));
        }
        store
            .update(ARTIST_ROLE_REQUESTS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }
}
