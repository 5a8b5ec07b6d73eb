//! The document store seam.
//!
//! Everything above this module talks to a `dyn DocumentStore`. Two
//! implementations exist: [`PgDocumentStore`] keeps documents in a single
//! JSONB table, [`MemoryDocumentStore`] keeps them in process.

mod memory;
mod postgres;

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use beatstore_core::types::{format_timestamp, DocId, Timestamp};

use crate::document::{Document, Fields, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::error::StoreError;
use crate::query::Query;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Capacity of the change feed. Slow subscribers lag and re-query.
pub const CHANGE_FEED_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One write, as announced on the change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionChange {
    pub collection: String,
    pub id: DocId,
    pub kind: ChangeKind,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. The store assigns the id and both timestamps.
    async fn insert(&self, collection: &str, data: Fields) -> Result<Document, StoreError>;

    /// Create or replace the document with a known id. `createdAt` survives
    /// replacement.
    async fn set(&self, collection: &str, id: &str, data: Fields) -> Result<Document, StoreError>;

    /// Create the document with a known id unless one already exists.
    /// Returns `None` when the id is taken; the existing document is untouched.
    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<Option<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge `entries` into the object stored under `field`, creating the
    /// object when it is missing. Returns `None` when the document does not exist.
    async fn merge_object(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entries: Fields,
    ) -> Result<Option<Document>, StoreError>;

    /// Merge `patch` into an existing document. A `null` value removes the
    /// field. Returns `None` when the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
    ) -> Result<Option<Document>, StoreError>;

    /// Atomically add `delta` to a numeric field, treating a missing field as 0.
    /// Returns `false` when the document does not exist.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<bool, StoreError>;

    /// Hard delete. Returns `false` when nothing was deleted.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Subscribe to the change feed of every collection.
    fn changes(&self) -> broadcast::Receiver<CollectionChange>;
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Hands out strictly increasing timestamps so that documents written in
/// sequence never share a `createdAt`.
#[derive(Debug)]
pub(crate) struct MonotonicClock {
    last: Mutex<Option<Timestamp>>,
}

impl MonotonicClock {
    pub(crate) fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    pub(crate) fn now(&self) -> String {
        let mut now = chrono::Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + chrono::Duration::microseconds(1);
            }
        }
        *last = Some(now);
        format_timestamp(now)
    }
}

/// Body for a fresh document: reserved keys dropped, both timestamps set.
pub(crate) fn stamp_new(mut data: Fields, now: &str) -> Fields {
    data.remove(ID_FIELD);
    data.insert(CREATED_AT_FIELD.to_string(), Value::String(now.to_string()));
    data.insert(UPDATED_AT_FIELD.to_string(), Value::String(now.to_string()));
    data
}

/// Split a patch into fields to write and fields to remove, stamping `updatedAt`.
pub(crate) fn split_patch(mut patch: Fields, now: &str) -> (Fields, Vec<String>) {
    patch.remove(ID_FIELD);
    patch.remove(CREATED_AT_FIELD);
    let mut removed = Vec::new();
    let mut writes = Fields::new();
    for (key, value) in patch {
        if value.is_null() {
            removed.push(key);
        } else {
            writes.insert(key, value);
        }
    }
    writes.insert(UPDATED_AT_FIELD.to_string(), Value::String(now.to_string()));
    (writes, removed)
}

pub(crate) fn notify(
    sender: &broadcast::Sender<CollectionChange>,
    collection: &str,
    id: &str,
    kind: ChangeKind,
) {
    // No receivers is fine.
    let _ = sender.send(CollectionChange {
        collection: collection.to_string(),
        id: id.to_string(),
        kind,
    });
}
