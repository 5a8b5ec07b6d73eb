//! Beat catalog operations.

use serde::Deserialize;
use serde_json::json;

use beatstore_core::catalog::{
    browse, clamp_page_size, distinct_genres, validate_search, CatalogSort, FEATURED_LIMIT,
    TRENDING_LIMIT,
};
use beatstore_core::error::CoreError;
use beatstore_core::pricing::validate_base_price;
use beatstore_core::session::Caller;
use beatstore_core::status::BeatStatus;
use beatstore_db::collections::BEATS;
use beatstore_db::models::beat::{Beat, BeatFilter, BeatLicenses, CreateBeat, UpdateBeat};
use beatstore_db::repositories::{BeatCounter, BeatRepo};
use beatstore_db::{LiveQuery, Subscription};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

const MIN_BPM: u32 = 20;
const MAX_BPM: u32 = 400;
const MAX_TITLE_LENGTH: usize = 200;

/// Storefront search parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseParams {
    pub search: Option<String>,
    pub genre: Option<String>,
    #[serde(default)]
    pub sort: CatalogSort,
}

/// Cursor paging for beat listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub limit: Option<usize>,
    pub start_after: Option<String>,
}

pub struct BeatService;

impl BeatService {
    /// Every published beat, newest first.
    pub async fn list_published(ctx: &ServiceContext) -> ServiceResult<Vec<Beat>> {
        Ok(BeatRepo::list_published(ctx.store()).await?)
    }

    pub async fn featured(ctx: &ServiceContext) -> ServiceResult<Vec<Beat>> {
        Ok(BeatRepo::featured(ctx.store(), FEATURED_LIMIT).await?)
    }

    pub async fn trending(ctx: &ServiceContext) -> ServiceResult<Vec<Beat>> {
        Ok(BeatRepo::trending(ctx.store(), TRENDING_LIMIT).await?)
    }

    /// One page of beats. Only admins see drafts and archived beats.
    pub async fn list(
        ctx: &ServiceContext,
        caller: Option<&Caller>,
        filter: BeatFilter,
        page: &PageParams,
    ) -> ServiceResult<Vec<Beat>> {
        let filter = Self::visible_filter(caller, filter);
        let limit = clamp_page_size(page.limit);
        Ok(BeatRepo::list(ctx.store(), &filter, Some(limit), page.start_after.as_deref()).await?)
    }

    /// Published beats matching a search, in the requested order.
    pub async fn browse(ctx: &ServiceContext, params: &BrowseParams) -> ServiceResult<Vec<Beat>> {
        if let Some(search) = &params.search {
            validate_search(search).map_err(invalid)?;
        }
        let filter = BeatFilter {
            status: Some(BeatStatus::Published),
            genre: params.genre.clone(),
            ..Default::default()
        };
        let beats = BeatRepo::list(ctx.store(), &filter, None, None).await?;
        Ok(browse(beats, params.search.as_deref(), params.sort))
    }

    /// Distinct genres across the published catalog.
    pub async fn genres(ctx: &ServiceContext) -> ServiceResult<Vec<String>> {
        let beats = BeatRepo::list_published(ctx.store()).await?;
        Ok(distinct_genres(beats.iter().map(|b| b.genre.as_str())))
    }

    /// A beat by id. Unpublished beats are only visible to admins.
    pub async fn get(ctx: &ServiceContext, caller: Option<&Caller>, id: &str) -> ServiceResult<Beat> {
        let beat = BeatRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Beat", id))?;
        if beat.status != BeatStatus::Published && !caller.is_some_and(Caller::is_admin) {
            return Err(CoreError::not_found("Beat", id).into());
        }
        Ok(beat)
    }

    pub async fn create(ctx: &ServiceContext, caller: &Caller, input: CreateBeat) -> ServiceResult<Beat> {
        caller.require_admin("create beats")?;
        validate_text("Title", &input.title)?;
        validate_text("Artist", &input.artist)?;
        validate_bpm(input.bpm)?;
        validate_base_price(input.price).map_err(invalid)?;

        let licenses = BeatLicenses::derive(input.price, None);
        let beat = BeatRepo::create(ctx.store(), &input, &licenses, &caller.user_id).await?;

        tracing::info!(beat_id = %beat.id, user_id = %caller.user_id, "Beat created");
        ctx.publish(
            PlatformEvent::new(event_types::BEAT_CREATED)
                .with_source("beat", beat.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "title": beat.title })),
        );
        if beat.status == BeatStatus::Published {
            Self::announce_published(ctx, caller, &beat);
        }
        Ok(beat)
    }

    /// Partial update. A new price re-derives the tier prices.
    pub async fn update(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateBeat,
    ) -> ServiceResult<Beat> {
        caller.require_admin("update beats")?;
        if let Some(title) = &input.title {
            validate_text("Title", title)?;
        }
        if let Some(artist) = &input.artist {
            validate_text("Artist", artist)?;
        }
        if let Some(bpm) = input.bpm {
            validate_bpm(bpm)?;
        }
        if let Some(price) = input.price {
            validate_base_price(price).map_err(invalid)?;
        }

        let existing = BeatRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Beat", id))?;
        let licenses = input
            .price
            .filter(|p| *p != existing.price)
            .map(|p| BeatLicenses::derive(p, Some(&existing.licenses)));

        let beat = BeatRepo::update(ctx.store(), id, &input, licenses.as_ref(), &caller.user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Beat", id))?;

        tracing::info!(beat_id = %id, user_id = %caller.user_id, "Beat updated");
        if existing.status != BeatStatus::Published && beat.status == BeatStatus::Published {
            Self::announce_published(ctx, caller, &beat);
        }
        Ok(beat)
    }

    pub async fn delete(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<()> {
        caller.require_admin("delete beats")?;
        if !BeatRepo::delete(ctx.store(), id).await? {
            return Err(CoreError::not_found("Beat", id).into());
        }
        tracing::info!(beat_id = %id, user_id = %caller.user_id, "Beat deleted");
        ctx.publish(
            PlatformEvent::new(event_types::BEAT_DELETED)
                .with_source("beat", id)
                .with_actor(caller.user_id.clone()),
        );
        Ok(())
    }

    /// Atomically bump a counter by one.
    pub async fn increment(ctx: &ServiceContext, id: &str, counter: BeatCounter) -> ServiceResult<()> {
        if !BeatRepo::increment(ctx.store(), id, counter, 1).await? {
            return Err(CoreError::not_found("Beat", id).into());
        }
        Ok(())
    }

    /// Live listing with the same visibility rules as [`list`](Self::list).
    pub async fn subscribe(
        ctx: &ServiceContext,
        caller: Option<&Caller>,
        filter: BeatFilter,
    ) -> ServiceResult<Subscription> {
        let filter = Self::visible_filter(caller, filter);
        let query = BeatRepo::filter_query(&filter);
        Ok(LiveQuery::new(BEATS, query).start(ctx.store.clone()).await?)
    }

    fn visible_filter(caller: Option<&Caller>, mut filter: BeatFilter) -> BeatFilter {
        if !caller.is_some_and(Caller::is_admin) {
            filter.status = Some(BeatStatus::Published);
        }
        filter
    }

    fn announce_published(ctx: &ServiceContext, caller: &Caller, beat: &Beat) {
        ctx.publish(
            PlatformEvent::new(event_types::BEAT_PUBLISHED)
                .with_source("beat", beat.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "title": beat.title, "artist": beat.artist })),
        );
    }
}

fn validate_text(field: &str, value: &str) -> ServiceResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(invalid(format!("{field} must not exceed {MAX_TITLE_LENGTH} characters")));
    }
    Ok(())
}

fn validate_bpm(bpm: u32) -> ServiceResult<()> {
    if !(MIN_BPM..=MAX_BPM).contains(&bpm) {
        return Err(invalid(format!("BPM must be between {MIN_BPM} and {MAX_BPM}")));
    }
    Ok(())
}
