//! Repository for the `credentials` collection.

use serde_json::Value;

use crate::collections::CREDENTIALS;
use crate::document::{encode, Fields};
use crate::error::StoreError;
use crate::models::user::{Credential, NewCredential};
use crate::query::Query;
use crate::store::DocumentStore;

/// Password credentials, one document per user keyed by user id.
pub struct CredentialRepo;

impl CredentialRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        user_id: &str,
        input: &NewCredential,
    ) -> Result<Credential, StoreError> {
        store.set(CREDENTIALS, user_id, encode(input)?).await?.decode()
    }

    pub async fn find_by_user(
        store: &dyn DocumentStore,
        user_id: &str,
    ) -> Result<Option<Credential>, StoreError> {
        store.get(CREDENTIALS, user_id).await?.map(|d| d.decode()).transpose()
    }

    /// Lookup by email. The email is matched lowercased.
    pub async fn find_by_email(
        store: &dyn DocumentStore,
        email: &str,
    ) -> Result<Option<Credential>, StoreError> {
        let query = Query::new()
            .where_eq("email", email.trim().to_lowercase())
            .limit(1);
        store
            .query(CREDENTIALS, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn update_password_hash(
        store: &dyn DocumentStore,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut patch = Fields::new();
        patch.insert("passwordHash".into(), Value::String(password_hash.to_string()));
        patch.insert("failedLoginCount".into(), Value::from(0));
        patch.insert("lockedUntil".into(), Value::Null);
        Ok(store.update(CREDENTIALS, user_id, patch).await?.is_some())
    }

    /// Count a failed sign-in. `locked_until` is written when the account locks.
    pub async fn record_failed_login(
        store: &dyn DocumentStore,
        user_id: &str,
        failed_count: u32,
        locked_until: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut patch = Fields::new();
        patch.insert("failedLoginCount".into(), Value::from(failed_count));
        patch.insert(
            "lockedUntil".into(),
            locked_until.map_or(Value::Null, |until| Value::String(until.to_string())),
        );
        store.update(CREDENTIALS, user_id, patch).await?;
        Ok(())
    }

    pub async fn reset_failed_logins(store: &dyn DocumentStore, user_id: &str) -> Result<(), StoreError> {
        let mut patch = Fields::new();
        patch.insert("failedLoginCount".into(), Value::from(0));
        patch.insert("lockedUntil".into(), Value::Null);
        store.update(CREDENTIALS, user_id, patch).await?;
        Ok(())
    }

    pub async fn delete(store: &dyn DocumentStore, user_id: &str) -> Result<bool, StoreError> {
        store.delete(CREDENTIALS, user_id).await
    }
}
