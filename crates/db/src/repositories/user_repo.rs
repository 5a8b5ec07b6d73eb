//! Repository for the `users` collection.

use serde_json::Value;

use beatstore_core::roles::Role;

use crate::collections::USERS;
use crate::document::{decode_all, encode, Fields};
use crate::error::StoreError;
use crate::models::user::{NewUser, UpdateProfile, User};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Provides CRUD operations for user profiles.
pub struct UserRepo;

impl UserRepo {
    /// Create the profile document under the user's id.
    pub async fn create(store: &dyn DocumentStore, id: &str, input: &NewUser) -> Result<User, StoreError> {
        store.set(USERS, id, encode(input)?).await?.decode()
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<User>, StoreError> {
        store.get(USERS, id).await?.map(|d| d.decode()).transpose()
    }

    pub async fn list(store: &dyn DocumentStore, role: Option<Role>) -> Result<Vec<User>, StoreError> {
        let query = Query::new()
            .where_eq_opt("role", role.map(|r| r.as_str()))
            .order_by("createdAt", Direction::Desc);
        decode_all(&store.query(USERS, &query).await?)
    }

    pub async fn update_profile(
        store: &dyn DocumentStore,
        id: &str,
        input: &UpdateProfile,
    ) -> Result<Option<User>, StoreError> {
        Self::patch(store, id, encode(input)?).await
    }

    pub async fn update_role(
        store: &dyn DocumentStore,
        id: &str,
        role: Role,
    ) -> Result<Option<User>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("role".into(), Value::String(role.as_str().to_string()));
        Self::patch(store, id, patch).await
    }

    pub async fn touch_last_login(
        store: &dyn DocumentStore,
        id: &str,
        at: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut patch = Fields::new();
        patch.insert("lastLoginAt".into(), Value::String(at.to_string()));
        Self::patch(store, id, patch).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(USERS, id).await
    }

    async fn patch(store: &dyn DocumentStore, id: &str, patch: Fields) -> Result<Option<User>, StoreError> {
        store
            .update(USERS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }
}
