use std::sync::Arc;

use beatstore_core::order_number::generate_order_number;
use beatstore_core::types::Timestamp;
use beatstore_db::DocumentStore;
use beatstore_events::{EventBus, PlatformEvent};

/// Produces a candidate order number for the given instant.
pub type OrderNumberSource = Arc<dyn Fn(Timestamp) -> String + Send + Sync>;

/// Shared handles every service operation runs against.
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn DocumentStore>,
    pub events: Arc<EventBus>,
    pub order_numbers: OrderNumberSource,
}

impl ServiceContext {
    pub fn new(store: Arc<dyn DocumentStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            events,
            order_numbers: Arc::new(generate_order_number),
        }
    }

    /// Replace the random order number generator.
    pub fn with_order_numbers(
        mut self,
        source: impl Fn(Timestamp) -> String + Send + Sync + 'static,
    ) -> Self {
        self.order_numbers = Arc::new(source);
        self
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn next_order_number(&self, now: Timestamp) -> String {
        (self.order_numbers)(now)
    }

    pub fn publish(&self, event: PlatformEvent) {
        self.events.publish(event);
    }
}
