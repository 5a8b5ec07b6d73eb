use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use beatstore_core::types::{new_doc_id, DocId};

use super::{
    notify, split_patch, stamp_new, ChangeKind, CollectionChange, DocumentStore, MonotonicClock,
    CHANGE_FEED_CAPACITY,
};
use crate::document::{type_name, Document, Fields, CREATED_AT_FIELD, UPDATED_AT_FIELD};
use crate::error::StoreError;
use crate::query::Query;

type Collection = BTreeMap<DocId, Fields>;

/// In-process document store. Used by tests and by `STORE_BACKEND=memory`.
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    clock: MonotonicClock,
    changes: broadcast::Sender<CollectionChange>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            clock: MonotonicClock::new(),
            changes,
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, data: Fields) -> Result<Document, StoreError> {
        let id = new_doc_id();
        let data = stamp_new(data, &self.clock.now());
        {
            let mut guard = self.collections.write().await;
            guard
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), data.clone());
        }
        notify(&self.changes, collection, &id, ChangeKind::Created);
        Ok(Document::new(id, data))
    }

    async fn set(&self, collection: &str, id: &str, data: Fields) -> Result<Document, StoreError> {
        let now = self.clock.now();
        let mut data = stamp_new(data, &now);
        let kind = {
            let mut guard = self.collections.write().await;
            let docs = guard.entry(collection.to_string()).or_default();
            let kind = match docs.get(id).and_then(|existing| existing.get(CREATED_AT_FIELD)) {
                Some(created) => {
                    data.insert(CREATED_AT_FIELD.to_string(), created.clone());
                    ChangeKind::Updated
                }
                None => ChangeKind::Created,
            };
            docs.insert(id.to_string(), data.clone());
            kind
        };
        notify(&self.changes, collection, id, kind);
        Ok(Document::new(id, data))
    }

    async fn create(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let data = stamp_new(data, &self.clock.now());
        {
            let mut guard = self.collections.write().await;
            let docs = guard.entry(collection.to_string()).or_default();
            if docs.contains_key(id) {
                return Ok(None);
            }
            docs.insert(id.to_string(), data.clone());
        }
        notify(&self.changes, collection, id, ChangeKind::Created);
        Ok(Some(Document::new(id, data)))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn merge_object(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        entries: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let now = self.clock.now();
        let merged = {
            let mut guard = self.collections.write().await;
            let Some(data) = guard.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
                return Ok(None);
            };
            let mut object = match data.remove(field) {
                None | Some(Value::Null) => Fields::new(),
                Some(Value::Object(existing)) => existing,
                Some(other) => {
                    let message = format!(
                        "cannot merge into {} field '{field}' of '{id}'",
                        type_name(&other)
                    );
                    data.insert(field.to_string(), other);
                    return Err(StoreError::InvalidDocument(message));
                }
            };
            object.extend(entries);
            data.insert(field.to_string(), Value::Object(object));
            data.insert(UPDATED_AT_FIELD.to_string(), Value::String(now));
            data.clone()
        };
        notify(&self.changes, collection, id, ChangeKind::Updated);
        Ok(Some(Document::new(id, merged)))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Fields,
    ) -> Result<Option<Document>, StoreError> {
        let (writes, removed) = split_patch(patch, &self.clock.now());
        let updated = {
            let mut guard = self.collections.write().await;
            let Some(data) = guard.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
                return Ok(None);
            };
            for key in &removed {
                data.remove(key);
            }
            data.extend(writes);
            data.clone()
        };
        notify(&self.changes, collection, id, ChangeKind::Updated);
        Ok(Some(Document::new(id, updated)))
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<bool, StoreError> {
        {
            let mut guard = self.collections.write().await;
            let Some(data) = guard.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
                return Ok(false);
            };
            let next = match data.get(field) {
                None | Some(Value::Null) => Value::from(delta),
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(current) => Value::from(current.saturating_add(delta)),
                    None => Value::from(n.as_f64().unwrap_or_default() + delta as f64),
                },
                Some(other) => {
                    return Err(StoreError::InvalidDocument(format!(
                        "cannot increment {} field '{field}' of '{id}'",
                        type_name(other)
                    )))
                }
            };
            data.insert(field.to_string(), next);
        }
        notify(&self.changes, collection, id, ChangeKind::Updated);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut guard = self.collections.write().await;
            guard
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if removed {
            notify(&self.changes, collection, id, ChangeKind::Deleted);
        }
        Ok(removed)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let docs: Vec<Document> = {
            let guard = self.collections.read().await;
            match guard.get(collection) {
                Some(docs) => docs
                    .iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect(),
                None => return Ok(Vec::new()),
            }
        };
        query.evaluate(&docs)
    }

    fn changes(&self) -> broadcast::Receiver<CollectionChange> {
        self.changes.subscribe()
    }
}
