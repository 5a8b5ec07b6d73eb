//! Durable event persistence.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every [`PlatformEvent`] to the `events` collection. It runs as
//! a background task until cancelled or until the bus is dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use beatstore_db::models::event::{NewEvent, StoredEvent};
use beatstore_db::repositories::EventRepo;
use beatstore_db::{DocumentStore, StoreError};

use crate::bus::PlatformEvent;

/// Payload keys that never reach the store.
pub const REDACTED_PAYLOAD_KEYS: &[&str] = &["resetToken"];

pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop.
    pub async fn run(
        store: Arc<dyn DocumentStore>,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = receiver.recv() => received,
            };
            match received {
                Ok(event) => {
                    if let Err(e) = Self::persist(store.as_ref(), &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event persistence lagged, some events were not persisted");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write one event.
    pub async fn persist(
        store: &dyn DocumentStore,
        event: &PlatformEvent,
    ) -> Result<StoredEvent, StoreError> {
        let record = NewEvent {
            event_type: event.event_type.clone(),
            source_entity_type: event.source_entity_type.clone(),
            source_entity_id: event.source_entity_id.clone(),
            actor_user_id: event.actor_user_id.clone(),
            payload: redact(&event.payload),
        };
        EventRepo::insert(store, &record).await
    }
}

fn redact(payload: &serde_json::Value) -> serde_json::Value {
    let mut payload = payload.clone();
    if let Some(map) = payload.as_object_mut() {
        for key in REDACTED_PAYLOAD_KEYS {
            map.remove(*key);
        }
    }
    payload
}
