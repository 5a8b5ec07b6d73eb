//! Repository for the `events` collection.

use crate::collections::EVENTS;
use crate::document::{decode_all, encode};
use crate::error::StoreError;
use crate::models::event::{NewEvent, StoredEvent};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Append-only log of platform events.
pub struct EventRepo;

impl EventRepo {
    pub async fn insert(store: &dyn DocumentStore, input: &NewEvent) -> Result<StoredEvent, StoreError> {
        store.insert(EVENTS, encode(input)?).await?.decode()
    }

    /// Newest first, optionally of one type.
    pub async fn list_recent(
        store: &dyn DocumentStore,
        event_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredEvent>, StoreError> {
        let query = Query::new()
            .where_eq_opt("eventType", event_type)
            .order_by("createdAt", Direction::Desc)
            .limit(limit);
        decode_all(&store.query(EVENTS, &query).await?)
    }
}
