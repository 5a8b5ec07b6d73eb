//! Persisted platform events.

use serde::{Deserialize, Serialize};

use beatstore_core::types::{DocId, Timestamp};

/// A document from the `events` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    #[serde(default)]
    pub id: DocId,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DocId>,
    pub actor_user_id: Option<DocId>,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DocId>,
    pub actor_user_id: Option<DocId>,
    pub payload: serde_json::Value,
}
