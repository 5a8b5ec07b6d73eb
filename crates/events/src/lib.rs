//! Beatstore event bus and notification infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope, with type names in
//!   [`event_types`].
//! - [`EventPersistence`]: background task writing every event to the
//!   `events` collection.
//! - [`delivery`]: SMTP email delivery.
//! - [`Notifier`]: turns order, collaboration and account events into emails.

pub mod bus;
pub mod delivery;
pub mod notifier;
pub mod persistence;

pub use bus::{event_types, EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, OutgoingEmail};
pub use notifier::Notifier;
pub use persistence::EventPersistence;
