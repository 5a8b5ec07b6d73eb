//! Repository for the `beats` collection.

use serde::Serialize;
use serde_json::Value;

use beatstore_core::status::BeatStatus;
use beatstore_core::types::{Amount, DocId};

use crate::collections::BEATS;
use crate::document::{decode_all, encode};
use crate::error::StoreError;
use crate::models::beat::{Beat, BeatFilter, BeatLicenses, CreateBeat, UpdateBeat};
use crate::query::{Direction, Query};
use crate::store::DocumentStore;

/// Counters kept on every beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatCounter {
    Plays,
    Downloads,
    Likes,
}

impl BeatCounter {
    pub fn field(self) -> &'static str {
        match self {
            BeatCounter::Plays => "plays",
            BeatCounter::Downloads => "downloads",
            BeatCounter::Likes => "likes",
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewBeat<'a> {
    title: &'a str,
    artist: &'a str,
    bpm: u32,
    key: &'a str,
    genre: &'a str,
    tags: &'a [String],
    price: Amount,
    audio_url: Option<&'a str>,
    artwork_url: Option<&'a str>,
    licenses: &'a BeatLicenses,
    featured: bool,
    trending: bool,
    status: BeatStatus,
    plays: u64,
    downloads: u64,
    likes: u64,
    created_by: &'a str,
    last_updated_by: &'a str,
}

/// Provides CRUD operations for beats.
pub struct BeatRepo;

impl BeatRepo {
    /// Insert a new beat with zeroed counters. Status defaults to draft.
    pub async fn create(
        store: &dyn DocumentStore,
        input: &CreateBeat,
        licenses: &BeatLicenses,
        created_by: &str,
    ) -> Result<Beat, StoreError> {
        let record = NewBeat {
            title: &input.title,
            artist: &input.artist,
            bpm: input.bpm,
            key: &input.key,
            genre: &input.genre,
            tags: &input.tags,
            price: input.price,
            audio_url: input.audio_url.as_deref(),
            artwork_url: input.artwork_url.as_deref(),
            licenses,
            featured: input.featured,
            trending: input.trending,
            status: input.status.unwrap_or(BeatStatus::Draft),
            plays: 0,
            downloads: 0,
            likes: 0,
            created_by,
            last_updated_by: created_by,
        };
        store.insert(BEATS, encode(&record)?).await?.decode()
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Beat>, StoreError> {
        store.get(BEATS, id).await?.map(|d| d.decode()).transpose()
    }

    /// Query matching a filter, newest first.
    pub fn filter_query(filter: &BeatFilter) -> Query {
        Query::new()
            .where_eq_opt("status", filter.status.map(|s| s.as_str()))
            .where_eq_opt("genre", filter.genre.as_deref())
            .where_eq_opt("featured", filter.featured)
            .where_eq_opt("trending", filter.trending)
            .order_by("createdAt", Direction::Desc)
    }

    /// Filtered listing, newest first, paged by a start-after cursor.
    pub async fn list(
        store: &dyn DocumentStore,
        filter: &BeatFilter,
        limit: Option<usize>,
        start_after: Option<&str>,
    ) -> Result<Vec<Beat>, StoreError> {
        let mut query = Self::filter_query(filter);
        query.limit = limit;
        query.start_after = start_after.map(DocId::from);
        decode_all(&store.query(BEATS, &query).await?)
    }

    pub async fn list_published(store: &dyn DocumentStore) -> Result<Vec<Beat>, StoreError> {
        let filter = BeatFilter {
            status: Some(BeatStatus::Published),
            ..Default::default()
        };
        Self::list(store, &filter, None, None).await
    }

    /// Published featured beats, newest first.
    pub async fn featured(store: &dyn DocumentStore, limit: usize) -> Result<Vec<Beat>, StoreError> {
        let filter = BeatFilter {
            status: Some(BeatStatus::Published),
            featured: Some(true),
            ..Default::default()
        };
        Self::list(store, &filter, Some(limit), None).await
    }

    /// Published trending beats, most played first.
    pub async fn trending(store: &dyn DocumentStore, limit: usize) -> Result<Vec<Beat>, StoreError> {
        let query = Query::new()
            .where_eq("status", BeatStatus::Published.as_str())
            .where_eq("trending", true)
            .order_by("plays", Direction::Desc)
            .limit(limit);
        decode_all(&store.query(BEATS, &query).await?)
    }

    /// Apply the non-`None` fields of `input`. `licenses` replaces the tier
    /// terms when the price changed.
    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        input: &UpdateBeat,
        licenses: Option<&BeatLicenses>,
        updated_by: &str,
    ) -> Result<Option<Beat>, StoreError> {
        let mut patch = encode(input)?;
        if let Some(licenses) = licenses {
            patch.insert("licenses".into(), serde_json::to_value(licenses)?);
        }
        patch.insert("lastUpdatedBy".into(), Value::String(updated_by.to_string()));
        store
            .update(BEATS, id, patch)
            .await?
            .map(|d| d.decode())
            .transpose()
    }

    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(BEATS, id).await
    }

    pub async fn increment(
        store: &dyn DocumentStore,
        id: &str,
        counter: BeatCounter,
        delta: i64,
    ) -> Result<bool, StoreError> {
        store.increment(BEATS, id, counter.field(), delta).await
    }

    /// Every beat regardless of status.
    pub async fn list_all(store: &dyn DocumentStore) -> Result<Vec<Beat>, StoreError> {
        Self::list(store, &BeatFilter::default(), None, None).await
    }
}
