//! Stored settings sections.

use serde::{Deserialize, Serialize};

use beatstore_core::settings::SettingsSection;
use beatstore_core::types::{DocId, Timestamp};

/// One settings document: the section fields plus who saved it and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument<T> {
    #[serde(flatten)]
    pub section: T,
    pub updated_at: Option<Timestamp>,
    pub updated_by: Option<DocId>,
}

impl<T: SettingsSection> SettingsDocument<T> {
    /// Section defaults for a document that was never saved.
    pub fn unsaved() -> Self {
        Self {
            section: T::default(),
            updated_at: None,
            updated_by: None,
        }
    }
}
