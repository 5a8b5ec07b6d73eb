//! Repository for the `settings` collection.

use serde_json::Value;

use beatstore_core::settings::SettingsSection;

use crate::collections::SETTINGS;
use crate::document::encode;
use crate::error::StoreError;
use crate::models::settings::SettingsDocument;
use crate::store::DocumentStore;

/// Singleton settings documents, one per section.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Load a section, falling back to defaults when it was never saved.
    pub async fn get<T: SettingsSection>(
        store: &dyn DocumentStore,
    ) -> Result<SettingsDocument<T>, StoreError> {
        match store.get(SETTINGS, T::KEY).await? {
            Some(doc) => doc.decode(),
            None => Ok(SettingsDocument::unsaved()),
        }
    }

    /// Replace a section.
    pub async fn save<T: SettingsSection>(
        store: &dyn DocumentStore,
        section: &T,
        updated_by: &str,
    ) -> Result<SettingsDocument<T>, StoreError> {
        let mut data = encode(section)?;
        data.insert("updatedBy".into(), Value::String(updated_by.to_string()));
        store.set(SETTINGS, T::KEY, data).await?.decode()
    }
}
