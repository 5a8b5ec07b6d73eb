//! Admin analytics over the catalog, orders and collaborations.

use serde::Serialize;

use beatstore_core::session::Caller;
use beatstore_core::status::OrderStatus;
use beatstore_core::statistics::{
    collaboration_statistics, engagement_totals, order_statistics, CollaborationStatistics,
    EngagementTotals, OrderStatistics,
};
use beatstore_core::types::{DocId, Timestamp};
use beatstore_db::models::beat::Beat;
use beatstore_db::models::content::Content;
use beatstore_db::models::order::Order;
use beatstore_db::repositories::{BeatRepo, CollaborationRepo, ContentRepo, OrderRepo};

use crate::context::ServiceContext;
use crate::error::ServiceResult;

/// Entries in each top-N list.
pub const TOP_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBeat {
    pub id: DocId,
    pub title: String,
    pub plays: u64,
    pub downloads: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContent {
    pub id: DocId,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: DocId,
    pub order_number: String,
    pub customer_email: String,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAnalytics {
    pub engagement: EngagementTotals,
    pub orders: OrderStatistics,
    pub collaborations: CollaborationStatistics,
    pub top_beats: Vec<TopBeat>,
    pub top_content: Vec<TopContent>,
    pub recent_orders: Vec<RecentOrder>,
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn overview(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<CatalogAnalytics> {
        caller.require_admin("view analytics")?;
        let store = ctx.store();
        let beats = BeatRepo::list_all(store).await?;
        let content = ContentRepo::list_all(store).await?;
        let orders = OrderRepo::list_all(store).await?;
        let collaborations = CollaborationRepo::list_all(store).await?;

        Ok(CatalogAnalytics {
            engagement: engagement_totals(beats.iter().map(Beat::metrics), content.iter().map(Content::metrics)),
            orders: order_statistics(orders.iter().map(|o| (o.status, o.total))),
            collaborations: collaboration_statistics(
                collaborations.iter().map(|c| (c.status, c.budget, c.paid_amount)),
            ),
            top_beats: top_beats(beats),
            top_content: top_content(content),
            recent_orders: recent_orders(orders),
        })
    }
}

fn top_beats(mut beats: Vec<Beat>) -> Vec<TopBeat> {
    beats.sort_by(|a, b| b.plays.cmp(&a.plays));
    beats
        .into_iter()
        .take(TOP_LIMIT)
        .map(|b| TopBeat {
            id: b.id,
            title: b.title,
            plays: b.plays,
            downloads: b.downloads,
            likes: b.likes,
        })
        .collect()
}

fn top_content(mut content: Vec<Content>) -> Vec<TopContent> {
    content.sort_by(|a, b| b.views.cmp(&a.views));
    content
        .into_iter()
        .take(TOP_LIMIT)
        .map(|c| TopContent {
            id: c.id,
            title: c.title,
            views: c.views,
            likes: c.likes,
            shares: c.shares,
        })
        .collect()
}

fn recent_orders(mut orders: Vec<Order>) -> Vec<RecentOrder> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
        .into_iter()
        .take(TOP_LIMIT)
        .map(|o| RecentOrder {
            id: o.id,
            order_number: o.order_number,
            customer_email: o.customer_email,
            total: o.total,
            status: o.status,
            created_at: o.created_at,
        })
        .collect()
}
