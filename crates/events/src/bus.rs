//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PlatformEvent`]s and is
//! shared via `Arc<EventBus>` across the application.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use beatstore_core::types::{DocId, Timestamp};

// ---------------------------------------------------------------------------
// Event type names
// ---------------------------------------------------------------------------

/// Dot-separated names of the events the platform publishes.
pub mod event_types {
    pub const USER_SIGNED_UP: &str = "user.signed_up";
    pub const USER_ROLE_CHANGED: &str = "user.role_changed";
    pub const PASSWORD_RESET_REQUESTED: &str = "password.reset_requested";

    pub const BEAT_CREATED: &str = "beat.created";
    pub const BEAT_PUBLISHED: &str = "beat.published";
    pub const BEAT_DELETED: &str = "beat.deleted";

    pub const ORDER_CREATED: &str = "order.created";
    pub const ORDER_STATUS_CHANGED: &str = "order.status_changed";
    pub const ORDER_COMPLETED: &str = "order.completed";

    pub const CONTENT_PUBLISHED: &str = "content.published";

    pub const COLLABORATION_CREATED: &str = "collaboration.created";
    pub const COLLABORATION_STATUS_CHANGED: &str = "collaboration.status_changed";
    pub const COLLABORATION_PAYMENT_RECORDED: &str = "collaboration.payment_recorded";

    pub const COLLAB_REQUEST_SUBMITTED: &str = "collab_request.submitted";
    pub const COLLAB_REQUEST_REVIEWED: &str = "collab_request.reviewed";

    pub const ARTIST_REQUEST_SUBMITTED: &str = "artist_request.submitted";
    pub const ARTIST_REQUEST_REVIEWED: &str = "artist_request.reviewed";

    pub const SUPPORT_MESSAGE_SENT: &str = "support.message_sent";
    pub const SETTINGS_UPDATED: &str = "settings.updated";
}

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`PlatformEvent::new`] and enriched with
/// [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor) and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"order.completed"`.
    pub event_type: String,

    /// Source entity kind (e.g. `"order"`, `"beat"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DocId>,

    /// The user that triggered the event.
    pub actor_user_id: Option<DocId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: Timestamp,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: impl Into<DocId>) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id.into());
        self
    }

    pub fn with_actor(mut self, user_id: impl Into<DocId>) -> Self {
        self.actor_user_id = Some(user_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// A string field of the payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use beatstore_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("order.created"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity. Slow receivers observe
    /// `RecvError::Lagged` once the buffer is full.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped when nobody listens.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = PlatformEvent::new(event_types::ORDER_CREATED)
            .with_source("order", "o1")
            .with_actor("u7")
            .with_payload(serde_json::json!({ "orderNumber": "JR-2024-00042" }));
        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "order.created");
        assert_eq!(received.source_entity_type.as_deref(), Some("order"));
        assert_eq!(received.source_entity_id.as_deref(), Some("o1"));
        assert_eq!(received.actor_user_id.as_deref(), Some("u7"));
        assert_eq!(received.payload_str("orderNumber"), Some("JR-2024-00042"));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new(event_types::BEAT_PUBLISHED));

        assert_eq!(rx1.recv().await.unwrap().event_type, "beat.published");
        assert_eq!(rx2.recv().await.unwrap().event_type, "beat.published");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new("orphan.event"));
    }

    #[test]
    fn bare_event_has_empty_optional_fields() {
        let event = PlatformEvent::new("bare.event");
        assert!(event.source_entity_type.is_none());
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
        assert_eq!(event.payload_str("missing"), None);
    }
}
