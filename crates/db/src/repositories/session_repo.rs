//! Repositories for the `sessions` and `passwordResets` collections.

use serde_json::Value;

use crate::collections::{PASSWORD_RESETS, SESSIONS};
use crate::document::{encode, Fields};
use crate::error::StoreError;
use crate::models::user::{NewPasswordReset, NewRefreshSession, PasswordReset, RefreshSession};
use crate::query::Query;
use crate::store::DocumentStore;

// ---------------------------------------------------------------------------
// SessionRepo
// ---------------------------------------------------------------------------

/// Refresh-token sessions. Only token hashes are stored.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewRefreshSession,
    ) -> Result<RefreshSession, StoreError> {
        store.insert(SESSIONS, encode(input)?).await?.decode()
    }

    pub async fn find_by_token_hash(
        store: &dyn DocumentStore,
        token_hash: &str,
    ) -> Result<Option<RefreshSession>, StoreError> {
        let query = Query::new().where_eq("tokenHash", token_hash).limit(1);
        store
            .query(SESSIONS, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(SESSIONS, id).await
    }

    /// Drop every session of a user. Returns how many were removed.
    pub async fn delete_for_user(store: &dyn DocumentStore, user_id: &str) -> Result<u64, StoreError> {
        let query = Query::new().where_eq("userId", user_id);
        let mut removed = 0;
        for doc in store.query(SESSIONS, &query).await? {
            if store.delete(SESSIONS, &doc.id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ---------------------------------------------------------------------------
// PasswordResetRepo
// ---------------------------------------------------------------------------

/// One-time password reset tokens. Only token hashes are stored.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewPasswordReset,
    ) -> Result<PasswordReset, StoreError> {
        store.insert(PASSWORD_RESETS, encode(input)?).await?.decode()
    }

    pub async fn find_by_token_hash(
        store: &dyn DocumentStore,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, StoreError> {
        let query = Query::new().where_eq("tokenHash", token_hash).limit(1);
        store
            .query(PASSWORD_RESETS, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn mark_used(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        let mut patch = Fields::new();
        patch.insert("used".into(), Value::Bool(true));
        Ok(store.update(PASSWORD_RESETS, id, patch).await?.is_some())
    }
}
