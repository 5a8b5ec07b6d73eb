//! Editorial content model and DTOs.

use serde::{Deserialize, Serialize};

use beatstore_core::statistics::ContentMetrics;
use beatstore_core::status::{ContentStatus, ContentType};
use beatstore_core::types::{DocId, Timestamp};

/// A document from the `content` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub id: DocId,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub author: DocId,
    pub author_name: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
    pub published_at: Option<Timestamp>,
    pub scheduled_for: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Content {
    pub fn metrics(&self) -> ContentMetrics {
        ContentMetrics {
            status: self.status,
            views: self.views,
            likes: self.likes,
            shares: self.shares,
        }
    }
}

/// DTO for creating content. The slug is derived from the title when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: Option<ContentStatus>,
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub scheduled_for: Option<Timestamp>,
}

/// DTO for updating content. Author, id and creation time are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContent {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub status: Option<ContentStatus>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
}
