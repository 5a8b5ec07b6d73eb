//! Dashboard aggregates computed by a single pass over documents.

use serde::Serialize;

use crate::status::{BeatStatus, CollaborationStatus, ContentStatus, OrderStatus};
use crate::types::Amount;

/* --------------------------------------------------------------------------
Orders
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub total_revenue: Amount,
    pub pending_orders: u64,
    pub completed_orders: u64,
    pub average_order_value: Amount,
}

/// Aggregate `(status, total)` pairs.
///
/// Revenue only counts completed orders; pending includes processing. The
/// average is revenue over completed orders and is zero when none completed.
pub fn order_statistics<I>(orders: I) -> OrderStatistics
where
    I: IntoIterator<Item = (OrderStatus, Amount)>,
{
    let mut stats = OrderStatistics::default();
    for (status, total) in orders {
        stats.total_orders += 1;
        match status {
            OrderStatus::Completed => {
                stats.completed_orders += 1;
                stats.total_revenue += total;
            }
            OrderStatus::Pending | OrderStatus::Processing => stats.pending_orders += 1,
            _ => {}
        }
    }
    if stats.completed_orders > 0 {
        stats.average_order_value = stats.total_revenue / stats.completed_orders as f64;
    }
    stats
}

/* --------------------------------------------------------------------------
Collaborations
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationStatistics {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
    pub total_revenue: Amount,
    pub pending_revenue: Amount,
}

/// Aggregate `(status, budget, paid)` triples.
///
/// Revenue is money received. Pending revenue is the unpaid remainder of
/// budgets on collaborations that are not cancelled.
pub fn collaboration_statistics<I>(collaborations: I) -> CollaborationStatistics
where
    I: IntoIterator<Item = (CollaborationStatus, Amount, Amount)>,
{
    let mut stats = CollaborationStatistics::default();
    for (status, budget, paid) in collaborations {
        stats.total += 1;
        if status.is_active() {
            stats.active += 1;
        }
        if status == CollaborationStatus::Completed {
            stats.completed += 1;
        }
        stats.total_revenue += paid;
        if status != CollaborationStatus::Cancelled && budget > paid {
            stats.pending_revenue += budget - paid;
        }
    }
    stats
}

/* --------------------------------------------------------------------------
Catalog engagement
-------------------------------------------------------------------------- */

/// The slice of a beat that analytics looks at.
#[derive(Debug, Clone, Copy)]
pub struct BeatMetrics {
    pub status: BeatStatus,
    pub featured: bool,
    pub plays: u64,
    pub downloads: u64,
    pub likes: u64,
}

/// The slice of a content item that analytics looks at.
#[derive(Debug, Clone, Copy)]
pub struct ContentMetrics {
    pub status: ContentStatus,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementTotals {
    pub total_beats: u64,
    pub published_beats: u64,
    pub featured_beats: u64,
    pub total_plays: u64,
    pub total_downloads: u64,
    pub total_beat_likes: u64,
    pub total_content: u64,
    pub published_content: u64,
    pub total_views: u64,
    pub total_content_likes: u64,
    pub total_shares: u64,
}

pub fn engagement_totals<B, C>(beats: B, content: C) -> EngagementTotals
where
    B: IntoIterator<Item = BeatMetrics>,
    C: IntoIterator<Item = ContentMetrics>,
{
    let mut totals = EngagementTotals::default();
    for beat in beats {
        totals.total_beats += 1;
        if beat.status == BeatStatus::Published {
            totals.published_beats += 1;
        }
        if beat.featured {
            totals.featured_beats += 1;
        }
        totals.total_plays += beat.plays;
        totals.total_downloads += beat.downloads;
        totals.total_beat_likes += beat.likes;
    }
    for item in content {
        totals.total_content += 1;
        if item.status == ContentStatus::Published {
            totals.published_content += 1;
        }
        totals.total_views += item.views;
        totals.total_content_likes += item.likes;
        totals.total_shares += item.shares;
    }
    totals
}
