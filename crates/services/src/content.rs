//! Editorial content: blog posts, news, tutorials and press.

use chrono::Utc;
use serde_json::json;

use beatstore_core::content::{
    derive_slug, stamps_published_at, validate_excerpt, validate_schedule, validate_slug,
    validate_title,
};
use beatstore_core::error::CoreError;
use beatstore_core::session::Caller;
use beatstore_core::status::{ContentStatus, ContentType};
use beatstore_core::types::{new_doc_id, now_string};
use beatstore_db::collections::CONTENT;
use beatstore_db::models::content::{Content, ContentFilter, CreateContent, UpdateContent};
use beatstore_db::repositories::{ContentCounter, ContentRepo};
use beatstore_db::{LiveQuery, Subscription};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

pub struct ContentService;

impl ContentService {
    /// Create content authored by the caller. Status defaults to draft.
    pub async fn create(ctx: &ServiceContext, caller: &Caller, input: CreateContent) -> ServiceResult<Content> {
        caller.require_admin("create content")?;
        validate_title(&input.title).map_err(invalid)?;
        if let Some(excerpt) = &input.excerpt {
            validate_excerpt(excerpt).map_err(invalid)?;
        }
        let status = input.status.unwrap_or(ContentStatus::Draft);
        validate_schedule(status, input.scheduled_for, Utc::now()).map_err(invalid)?;

        let slug = match &input.slug {
            Some(slug) => slug.clone(),
            None => derive_slug(&input.title, &new_doc_id()),
        };
        validate_slug(&slug).map_err(invalid)?;
        Self::ensure_slug_free(ctx, &slug, None).await?;

        let published_at = stamps_published_at(Some(status), false).then(now_string);
        let content = ContentRepo::create(
            ctx.store(),
            &input,
            &slug,
            status,
            &caller.user_id,
            caller.label(),
            published_at.as_deref(),
        )
        .await?;

        tracing::info!(content_id = %content.id, slug = %content.slug, user_id = %caller.user_id, "Content created");
        if content.status == ContentStatus::Published {
            Self::announce_published(ctx, caller, &content);
        }
        Ok(content)
    }

    /// Content by id. Unpublished items are only visible to admins.
    pub async fn get(ctx: &ServiceContext, caller: Option<&Caller>, id: &str) -> ServiceResult<Content> {
        let content = ContentRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Content", id))?;
        Self::ensure_visible(caller, content, id)
    }

    pub async fn get_by_slug(ctx: &ServiceContext, caller: Option<&Caller>, slug: &str) -> ServiceResult<Content> {
        let content = ContentRepo::find_by_slug(ctx.store(), slug)
            .await?
            .ok_or_else(|| CoreError::not_found("Content", slug))?;
        Self::ensure_visible(caller, content, slug)
    }

    /// Filtered listing. Non-admins only see published items.
    pub async fn list(
        ctx: &ServiceContext,
        caller: Option<&Caller>,
        filter: ContentFilter,
    ) -> ServiceResult<Vec<Content>> {
        let filter = Self::visible_filter(caller, filter);
        Ok(ContentRepo::list(ctx.store(), &filter).await?)
    }

    pub async fn published(
        ctx: &ServiceContext,
        content_type: Option<ContentType>,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<Content>> {
        Ok(ContentRepo::published(ctx.store(), content_type, limit).await?)
    }

    pub async fn featured(ctx: &ServiceContext, limit: usize) -> ServiceResult<Vec<Content>> {
        Ok(ContentRepo::featured(ctx.store(), limit).await?)
    }

    /// Partial update. Publishing stamps `publishedAt` if it was never set.
    pub async fn update(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateContent,
    ) -> ServiceResult<Content> {
        caller.require_admin("update content")?;
        if let Some(title) = &input.title {
            validate_title(title).map_err(invalid)?;
        }
        if let Some(excerpt) = &input.excerpt {
            validate_excerpt(excerpt).map_err(invalid)?;
        }
        if let Some(slug) = &input.slug {
            validate_slug(slug).map_err(invalid)?;
        }

        let existing = ContentRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Content", id))?;
        if let Some(slug) = &input.slug {
            Self::ensure_slug_free(ctx, slug, Some(id)).await?;
        }
        let status = input.status.unwrap_or(existing.status);
        let scheduled_for = input.scheduled_for.or(existing.scheduled_for);
        if input.status.is_some() || input.scheduled_for.is_some() {
            validate_schedule(status, scheduled_for, Utc::now()).map_err(invalid)?;
        }

        let published_at =
            stamps_published_at(input.status, existing.published_at.is_some()).then(now_string);
        let content = ContentRepo::update(ctx.store(), id, &input, published_at.as_deref())
            .await?
            .ok_or_else(|| CoreError::not_found("Content", id))?;

        tracing::info!(content_id = %id, user_id = %caller.user_id, "Content updated");
        if existing.status != ContentStatus::Published && content.status == ContentStatus::Published {
            Self::announce_published(ctx, caller, &content);
        }
        Ok(content)
    }

    pub async fn delete(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<()> {
        caller.require_admin("delete content")?;
        if !ContentRepo::delete(ctx.store(), id).await? {
            return Err(CoreError::not_found("Content", id).into());
        }
        tracing::info!(content_id = %id, user_id = %caller.user_id, "Content deleted");
        Ok(())
    }

    pub async fn increment(ctx: &ServiceContext, id: &str, counter: ContentCounter) -> ServiceResult<()> {
        if !ContentRepo::increment(ctx.store(), id, counter).await? {
            return Err(CoreError::not_found("Content", id).into());
        }
        Ok(())
    }

    pub async fn subscribe(
        ctx: &ServiceContext,
        caller: Option<&Caller>,
        filter: ContentFilter,
    ) -> ServiceResult<Subscription> {
        let filter = Self::visible_filter(caller, filter);
        let query = ContentRepo::filter_query(&filter);
        Ok(LiveQuery::new(CONTENT, query).start(ctx.store.clone()).await?)
    }

    fn visible_filter(caller: Option<&Caller>, mut filter: ContentFilter) -> ContentFilter {
        if !caller.is_some_and(Caller::is_admin) {
            filter.status = Some(ContentStatus::Published);
        }
        filter
    }

    fn ensure_visible(caller: Option<&Caller>, content: Content, key: &str) -> ServiceResult<Content> {
        if content.status != ContentStatus::Published && !caller.is_some_and(Caller::is_admin) {
            return Err(CoreError::not_found("Content", key).into());
        }
        Ok(content)
    }

    async fn ensure_slug_free(ctx: &ServiceContext, slug: &str, own_id: Option<&str>) -> ServiceResult<()> {
        match ContentRepo::find_by_slug(ctx.store(), slug).await? {
            Some(other) if Some(other.id.as_str()) != own_id => {
                Err(CoreError::Conflict(format!("Slug '{slug}' is already in use")).into())
            }
            _ => Ok(()),
        }
    }

    fn announce_published(ctx: &ServiceContext, caller: &Caller, content: &Content) {
        ctx.publish(
            PlatformEvent::new(event_types::CONTENT_PUBLISHED)
                .with_source("content", content.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "title": content.title, "slug": content.slug })),
        );
    }
}
