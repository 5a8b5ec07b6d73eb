//! Email notifications for platform events.
//!
//! [`Notifier`] listens on the bus and mails the people an event concerns:
//! customers about their orders, clients about their collaborations, and
//! users about password resets. Order and collaboration emails respect the
//! stored [`NotificationSettings`]; password resets are always sent.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use beatstore_core::settings::NotificationSettings;
use beatstore_db::repositories::SettingsRepo;
use beatstore_db::DocumentStore;

use crate::bus::{event_types, PlatformEvent};
use crate::delivery::email::{EmailDelivery, OutgoingEmail};

pub struct Notifier {
    delivery: EmailDelivery,
    store: Arc<dyn DocumentStore>,
}

impl Notifier {
    pub fn new(delivery: EmailDelivery, store: Arc<dyn DocumentStore>) -> Self {
        Self { delivery, store }
    }

    /// Run the notification loop until cancelled or the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>, cancel: CancellationToken) {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => break,
                received = receiver.recv() => received,
            };
            match received {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some emails were not sent");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("Notifier stopped");
    }

    async fn handle(&self, event: &PlatformEvent) {
        let settings = match SettingsRepo::get::<NotificationSettings>(self.store.as_ref()).await {
            Ok(doc) => doc.section,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default notification settings");
                NotificationSettings::default()
            }
        };
        let Some(email) = compose(event, &settings, &self.delivery.config().app_base_url) else {
            return;
        };
        if let Err(e) = self.delivery.send(&email).await {
            tracing::error!(error = %e, event_type = %event.event_type, "Failed to send notification email");
        }
    }
}

/// The email an event should produce, if any.
pub fn compose(
    event: &PlatformEvent,
    settings: &NotificationSettings,
    app_base_url: &str,
) -> Option<OutgoingEmail> {
    match event.event_type.as_str() {
        event_types::ORDER_CREATED if settings.email_order_notifications => {
            let number = event.payload_str("orderNumber")?;
            let total = event.payload.get("total").and_then(|v| v.as_f64()).unwrap_or(0.0);
            Some(OutgoingEmail {
                to: event.payload_str("customerEmail")?.to_string(),
                subject: format!("Order {number} received"),
                body: format!(
                    "Thanks for your order {number}.\nTotal: {total:.2}\n\nWe will email you again once your downloads are ready."
                ),
            })
        }
        event_types::ORDER_COMPLETED if settings.email_order_notifications => {
            let number = event.payload_str("orderNumber")?;
            Some(OutgoingEmail {
                to: event.payload_str("customerEmail")?.to_string(),
                subject: format!("Order {number} is ready"),
                body: format!(
                    "Your order {number} is complete.\nDownload your beats at {app_base_url}/customer/downloads"
                ),
            })
        }
        event_types::COLLABORATION_STATUS_CHANGED if settings.email_collaboration_notifications => {
            let title = event.payload_str("title")?;
            let status = event.payload_str("status")?;
            Some(OutgoingEmail {
                to: event.payload_str("clientEmail")?.to_string(),
                subject: format!("Collaboration update: {title}"),
                body: format!("The collaboration \"{title}\" is now {}.", status.replace('_', " ")),
            })
        }
        event_types::PASSWORD_RESET_REQUESTED => {
            let token = event.payload_str("resetToken")?;
            let expires = event.payload.get("expiresInMinutes").and_then(|v| v.as_u64()).unwrap_or(60);
            Some(OutgoingEmail {
                to: event.payload_str("email")?.to_string(),
                subject: "Reset your password".to_string(),
                body: format!(
                    "Use the link below to choose a new password. It expires in {expires} minutes.\n\n{app_base_url}/reset-password?token={token}\n\nIf you did not ask for this, ignore this email."
                ),
            })
        }
        _ => None,
    }
}
