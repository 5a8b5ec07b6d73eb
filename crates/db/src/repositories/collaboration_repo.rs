//! Repository for the `collaborations` collection.

use serde_json::Value;

use beatstore_core::status::{CollaborationStatus, PaymentStatus};
use beatstore_core::types::Amount;

use crate::collections::COLLABORATIONS;
use crate::document::{decode_all, encode, Fields};
use crate::error::StoreError;
use crate::models::collaboration::{
    Collaboration, CollaborationFilter, NewCollaboration, UpdateCollaboration,
};
use crate::query::{Condition, Direction, Query};
use crate::store::DocumentStore;

/// Provides CRUD operations for collaborations.
pub struct CollaborationRepo;

impl CollaborationRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewCollaboration,
    ) -> Result<Collaboration, StoreError> {
        store.insert(COLLABORATIONS, encode(input)?).await?.decode()
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<Collaboration>, StoreError> {
        store.get(COLLABORATIONS, id).await?.map(|d| d.decode()).transpose()
    }

    pub fn filter_query(filter: &CollaborationFilter) -> Query {
        Query::new()
            .where_eq_opt("status", filter.status.map(|s| s.as_str()))
            .where_eq_opt("type", filter.collaboration_type.map(|t| t.as_str()))
            .where_eq_opt("paymentStatus", filter.payment_status.map(|p| p.as_str()))
            .where_eq_opt("assignedTo", filter.assigned_to.as_deref())
            .order_by("createdAt", Direction::Desc)
    }

    pub async fn list(
        store: &dyn DocumentStore,
        filter: &CollaborationFilter,
    ) -> Result<Vec<Collaboration>, StoreError> {
        decode_all(&store.query(COLLABORATIONS, &Self::filter_query(filter)).await?)
    }

    /// Query for an artist's view: assigned to them or addressed to their email.
    pub fn artist_query(user_id: &str, email: &str) -> Query {
        Query::new()
            .any_of(vec![
                Condition::eq("assignedTo", user_id),
                Condition::eq("clientEmail", email),
            ])
            .order_by("createdAt", Direction::Desc)
    }

    pub async fn list_for_artist(
        store: &dyn DocumentStore,
        user_id: &str,
        email: &str,
    ) -> Result<Vec<Collaboration>, StoreError> {
        decode_all(&store.query(COLLABORATIONS, &Self::artist_query(user_id, email)).await?)
    }

    /// Apply detail edits. `payment_status` is written when the budget changed.
    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        input: &UpdateCollaboration,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Option<Collaboration>, StoreError> {
        let mut patch = encode(input)?;
        if let Some(status) = payment_status {
            patch.insert("paymentStatus".into(), Value::String(status.as_str().to_string()));
        }
        Self::patch(store, id, patch).await
    }

    /// Move to `status`. Completion stamps `endDate` when given.
    pub async fn set_status(
        store: &dyn DocumentStore,
        id: &str,
        status: CollaborationStatus,
        end_date: Option<&str>,
    ) -> Result<Option<Collaboration>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("status".into(), Value::String(status.as_str().to_string()));
        if let Some(date) = end_date {
            patch.insert("endDate".into(), Value::String(date.to_string()));
        }
        Self::patch(store, id, patch).await
    }

    pub async fn set_payment(
        store: &dyn DocumentStore,
        id: &str,
        paid_amount: Amount,
        payment_status: PaymentStatus,
    ) -> Result<Option<Collaboration>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("paidAmount".into(), Value::from(paid_amount));
        patch.insert(
            "paymentStatus".into(),
            Value::String(payment_status.as_str().to_string()),
        );
        Self::patch(store, id, patch).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(COLLABORATIONS, id).await
    }

    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Collaboration>, StoreError> {
        Self::list(store, &CollaborationFilter::default()).await
    }

    async fn patch(
        store: &dyn DocumentStore,
        id: &str,
        patch: Fields,
    ) -> Result<Option<Collaboration>, StoreError> {
        store
            .update(COLLABORATIONS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }
}
