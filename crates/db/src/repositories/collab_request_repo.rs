//! Repository for the `collabRequests` collection.

use serde_json::Value;

use beatstore_core::status::RequestStatus;

use crate::collections::COLLAB_REQUESTS;
use crate::document::{decode_all, encode, Fields};
use crate::error::StoreError;
use crate::models::collab_request::{CollabRequest, NewCollabRequest};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Provides CRUD operations for collaboration requests.
pub struct CollabRequestRepo;

impl CollabRequestRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewCollabRequest,
    ) -> Result<CollabRequest, StoreError> {
        store.insert(COLLAB_REQUESTS, encode(input)?).await?.decode()
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<CollabRequest>, StoreError> {
        store.get(COLLAB_REQUESTS, id).await?.map(|d| d.decode()).transpose()
    }

    /// Newest first, optionally by status and by submitting artist.
    pub fn list_query(status: Option<RequestStatus>, artist_id: Option<&str>) -> Query {
        Query::new()
            .where_eq_opt("status", status.map(|s| s.as_str()))
            .where_eq_opt("artistId", artist_id)
            .order_by("createdAt", Direction::Desc)
    }

    pub async fn list(
        store: &dyn DocumentStore,
        status: Option<RequestStatus>,
        artist_id: Option<&str>,
    ) -> Result<Vec<CollabRequest>, StoreError> {
        decode_all(&store.query(COLLAB_REQUESTS, &Self::list_query(status, artist_id)).await?)
    }

    /// Record a review decision.
    pub async fn review(
        store: &dyn DocumentStore,
        id: &str,
        status: RequestStatus,
        reviewer_id: &str,
        note: Option<&str>,
        collaboration_id: Option<&str>,
    ) -> Result<Option<CollabRequest>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("status".into(), Value::String(status.as_str().to_string()));
        patch.insert("reviewedBy".into(), Value::String(reviewer_id.to_string()));
        if let Some(note) = note {
            patch.insert("reviewNote".into(), Value::String(note.to_string()));
        }
        if let Some(collab) = collaboration_id {
            patch.insert("collaborationId".into(), Value::String(collab.to_string()));
        }
        store
            .update(COLLAB_REQUESTS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(COLLAB_REQUESTS, id).await
    }
}
