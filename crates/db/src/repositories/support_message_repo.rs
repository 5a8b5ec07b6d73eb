//! Repository for the `supportMessages` collection.

use beatstore_core::chat::in_thread;

use crate::collections::SUPPORT_MESSAGES;
use crate::document::{decode_all, encode};
use crate::error::StoreError;
use crate::models::support_message::{NewSupportMessage, SupportMessage};
use crate::query::{Condition, Direction, Query};
use crate::store::DocumentStore;

/// Provides access to support chat messages.
pub struct SupportMessageRepo;

impl SupportMessageRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewSupportMessage,
    ) -> Result<SupportMessage, StoreError> {
        store.insert(SUPPORT_MESSAGES, encode(input)?).await?.decode()
    }

    /// Every message, newest first.
    pub fn all_query() -> Query {
        Query::new().order_by("createdAt", Direction::Desc)
    }

    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<SupportMessage>, StoreError> {
        decode_all(&store.query(SUPPORT_MESSAGES, &Self::all_query()).await?)
    }

    /// Candidates for a user's thread, oldest first. Callers narrow the
    /// result with [`in_thread`].
    pub fn thread_query(user_id: &str) -> Query {
        Query::new()
            .any_of(vec![
                Condition::eq("senderId", user_id),
                Condition::eq("recipientId", user_id),
            ])
            .order_by("createdAt", Direction::Asc)
    }

    /// A user's thread with support, oldest first.
    pub async fn thread(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<Vec<SupportMessage>, StoreError> {
        let messages: Vec<SupportMessage> =
            decode_all(&store.query(SUPPORT_MESSAGES, &Self::thread_query(user_id)).await?)?;
        Ok(messages
            .into_iter()
            .filter(|m| in_thread(m, user_id))
            .collect())
    }
}
