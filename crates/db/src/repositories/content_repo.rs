//! Repository for the `content` collection.

use serde::Serialize;
use serde_json::Value;

use beatstore_core::status::{ContentStatus, ContentType};
use beatstore_core::types::Timestamp;

use crate::collections::CONTENT;
use crate::document::{decode_all, encode};
use crate::error::StoreError;
use crate::models::content::{Content, ContentFilter, CreateContent, UpdateContent};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Engagement counters on content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCounter {
    Views,
    Likes,
    Shares,
}

impl ContentCounter {
    pub fn field(self) -> &'static str {
        match self {
            ContentCounter::Views => "views",
            ContentCounter::Likes => "likes",
            ContentCounter::Shares => "shares",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewContent<'a> {
    #[serde(rename = "type")]
    content_type: ContentType,
    status: ContentStatus,
    title: &'a str,
    slug: &'a str,
    excerpt: Option<&'a str>,
    body: &'a str,
    category: Option<&'a str>,
    tags: &'a [String],
    cover_image_url: Option<&'a str>,
    featured: bool,
    author: &'a str,
    author_name: &'a str,
    views: u64,
    likes: u64,
    shares: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    published_at: Option<&'a str>,
    scheduled_for: Option<Timestamp>,
}

/// Provides CRUD operations for editorial content.
pub struct ContentRepo;

impl ContentRepo {
    /// Insert content with zeroed counters.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        store: &dyn DocumentStore,
        input: &CreateContent,
        slug: &str,
        status: ContentStatus,
        author: &str,
        author_name: &str,
        published_at: Option<&str>,
    ) -> Result<Content, StoreError> {
        let record = NewContent {
            content_type: input.content_type,
            status,
            title: &input.title,
            slug,
            excerpt: input.excerpt.as_deref(),
            body: &input.body,
            category: input.category.as_deref(),
            tags: &input.tags,
            cover_image_url: input.cover_image_url.as_deref(),
            featured: input.featured,
            author,
            author_name,
            views: 0,
            likes: 0,
            shares: 0,
            published_at,
            scheduled_for: input.scheduled_for,
        };
        store.insert(CONTENT, encode(&record)?).await?.decode()
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Content>, StoreError> {
        store.get(CONTENT, id).await?.map(|d| d.decode()).transpose()
    }

    pub async fn find_by_slug(store: &dyn DocumentStore, slug: &str) -> Result<Option<Content>, StoreError> {
        let query = Query::new().where_eq("slug", slug).limit(1);
        store
            .query(CONTENT, &query)
            .await?
            .first()
            .map(|d| d.decode())
            .transpose()
    }

    /// Query for a filtered listing, newest first.
    pub fn filter_query(filter: &ContentFilter) -> Query {
        let mut query = Query::new()
            .where_eq_opt("type", filter.content_type.map(|t| t.as_str()))
            .where_eq_opt("status", filter.status.map(|s| s.as_str()))
            .where_eq_opt("category", filter.category.as_deref())
            .where_eq_opt("featured", filter.featured)
            .order_by("createdAt", Direction::Desc);
        query.limit = filter.limit;
        query
    }

    pub async fn list(store: &dyn DocumentStore, filter: &ContentFilter) -> Result<Vec<Content>, StoreError> {
        decode_all(&store.query(CONTENT, &Self::filter_query(filter)).await?)
    }

    /// Published content, most recently published first.
    pub async fn published(
        store: &dyn DocumentStore,
        content_type: Option<ContentType>,
        limit: Option<usize>,
    ) -> Result<Vec<Content>, StoreError> {
        let mut query = Query::new()
            .where_eq("status", ContentStatus::Published.as_str())
            .where_eq_opt("type", content_type.map(|t| t.as_str()))
            .order_by("publishedAt", Direction::Desc);
        query.limit = limit;
        decode_all(&store.query(CONTENT, &query).await?)
    }

    /// Published featured content, most recently published first.
    pub async fn featured(store: &dyn DocumentStore, limit: usize) -> Result<Vec<Content>, StoreError> {
        let query = Query::new()
            .where_eq("status", ContentStatus::Published.as_str())
            .where_eq("featured", true)
            .order_by("publishedAt", Direction::Desc)
            .limit(limit);
        decode_all(&store.query(CONTENT, &query).await?)
    }

    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        input: &UpdateContent,
        published_at: Option<&str>,
    ) -> Result<Option<Content>, StoreError> {
        let mut patch = encode(input)?;
        if let Some(at) = published_at {
            patch.insert("publishedAt".into(), Value::String(at.to_string()));
        }
        store
            .update(CONTENT, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(CONTENT, id).await
    }

    pub async fn increment(
        store: &dyn DocumentStore,
        id: &str,
        counter: ContentCounter,
    ) -> Result<bool, StoreError> {
        store.increment(CONTENT, id, counter.field(), 1).await
    }

    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Content>, StoreError> {
        decode_all(&store.query(CONTENT, &Query::new()).await?)
    }
}
