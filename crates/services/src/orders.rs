//! Order placement, fulfilment and reporting.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use beatstore_core::cart::{Cart, CartItem};
use beatstore_core::error::CoreError;
use beatstore_core::order_number::MAX_ORDER_NUMBER_ATTEMPTS;
use beatstore_core::session::Caller;
use beatstore_core::settings::looks_like_email;
use beatstore_core::statistics::{order_statistics, OrderStatistics};
use beatstore_core::status::{BeatStatus, OrderStatus};
use beatstore_core::types::{now_string, Amount, DocId};
use beatstore_db::collections::ORDERS;
use beatstore_db::models::order::{
    CreateOrder, DownloadEntry, NewOrder, Order, OrderLine, OrderListParams, UpdateOrder,
    UpdateOrderStatus,
};
use beatstore_db::repositories::{BeatRepo, OrderRepo};
use beatstore_db::{LiveQuery, Query, Subscription};
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

/// Most lines accepted in one order.
pub const MAX_ORDER_LINES: usize = 50;

/// Server-side pricing of a cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub items: Vec<CartItem>,
    pub subtotal: Amount,
    pub total: Amount,
}

pub struct OrderService;

impl OrderService {
    /// Price requested lines from the catalog. One line per beat; a repeated
    /// beat keeps its last requested tier.
    pub async fn quote(ctx: &ServiceContext, lines: &[OrderLine]) -> ServiceResult<CartQuote> {
        if lines.is_empty() {
            return Err(invalid("Cart is empty".to_string()));
        }
        if lines.len() > MAX_ORDER_LINES {
            return Err(invalid(format!("At most {MAX_ORDER_LINES} items per order")));
        }
        let mut cart = Cart::new();
        for line in lines {
            let beat = BeatRepo::find_by_id(ctx.store(), &line.beat_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Beat", line.beat_id.clone()))?;
            if beat.status != BeatStatus::Published {
                return Err(invalid(format!("Beat '{}' is not for sale", beat.title)));
            }
            if !beat.licenses.terms(line.license).available {
                return Err(invalid(format!(
                    "The {} license for '{}' is not available",
                    line.license, beat.title
                )));
            }
            cart.add(CartItem::priced(beat.id, beat.title, beat.price, line.license));
        }
        let total = cart.total();
        Ok(CartQuote {
            items: cart.into_items(),
            subtotal: total,
            total,
        })
    }

    /// Place a pending order for the caller.
    pub async fn create(ctx: &ServiceContext, caller: &Caller, input: CreateOrder) -> ServiceResult<Order> {
        let quote = Self::quote(ctx, &input.items).await?;
        let order_number = Self::allocate_order_number(ctx).await?;

        let record = NewOrder {
            order_number,
            customer_id: caller.user_id.clone(),
            customer_email: caller.email.clone(),
            customer_name: input.customer_name.or_else(|| caller.display_name.clone()),
            items: quote.items,
            subtotal: quote.subtotal,
            total: quote.total,
            status: OrderStatus::Pending,
            payment_method: input.payment_method,
        };
        let order = OrderRepo::create(ctx.store(), &record).await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %caller.user_id,
            total = order.total,
            "Order created"
        );
        ctx.publish(
            PlatformEvent::new(event_types::ORDER_CREATED)
                .with_source("order", order.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(json!({
                    "orderNumber": order.order_number,
                    "customerEmail": order.customer_email,
                    "total": order.total,
                })),
        );
        Ok(order)
    }

    pub async fn get(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<Order> {
        let order = OrderRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        caller.require_owner_or_admin(&order.customer_id, "view this order")?;
        Ok(order)
    }

    pub async fn get_by_number(
        ctx: &ServiceContext,
        caller: &Caller,
        order_number: &str,
    ) -> ServiceResult<Order> {
        let order = OrderRepo::find_by_number(ctx.store(), order_number)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", order_number))?;
        caller.require_owner_or_admin(&order.customer_id, "view this order")?;
        Ok(order)
    }

    pub async fn list(
        ctx: &ServiceContext,
        caller: &Caller,
        params: &OrderListParams,
    ) -> ServiceResult<Vec<Order>> {
        caller.require_admin("list orders")?;
        Ok(OrderRepo::list(ctx.store(), params).await?)
    }

    pub async fn list_for_customer(
        ctx: &ServiceContext,
        caller: &Caller,
        customer_id: &str,
    ) -> ServiceResult<Vec<Order>> {
        caller.require_owner_or_admin(customer_id, "list these orders")?;
        Ok(OrderRepo::list_by_customer(ctx.store(), customer_id).await?)
    }

    pub async fn recent(ctx: &ServiceContext, caller: &Caller, limit: usize) -> ServiceResult<Vec<Order>> {
        caller.require_admin("list recent orders")?;
        Ok(OrderRepo::recent(ctx.store(), limit).await?)
    }

    /// Change the status. Entering `completed` stamps `completedAt` once.
    pub async fn update_status(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateOrderStatus,
    ) -> ServiceResult<Order> {
        caller.require_admin("change order status")?;
        let existing = OrderRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;

        let completed_at = (input.status == OrderStatus::Completed && existing.completed_at.is_none())
            .then(now_string);
        let order = OrderRepo::update_status(
            ctx.store(),
            id,
            input.status,
            input.admin_note.as_deref(),
            completed_at.as_deref(),
        )
        .await?
        .ok_or_else(|| CoreError::not_found("Order", id))?;

        tracing::info!(
            order_id = %id,
            from = %existing.status,
            to = %order.status,
            user_id = %caller.user_id,
            "Order status changed"
        );
        let payload = json!({
            "orderNumber": order.order_number,
            "customerEmail": order.customer_email,
            "from": existing.status,
            "status": order.status,
        });
        ctx.publish(
            PlatformEvent::new(event_types::ORDER_STATUS_CHANGED)
                .with_source("order", order.id.clone())
                .with_actor(caller.user_id.clone())
                .with_payload(payload.clone()),
        );
        if existing.status != OrderStatus::Completed && order.status == OrderStatus::Completed {
            ctx.publish(
                PlatformEvent::new(event_types::ORDER_COMPLETED)
                    .with_source("order", order.id.clone())
                    .with_actor(caller.user_id.clone())
                    .with_payload(payload),
            );
        }
        Ok(order)
    }

    /// Edit customer details and notes. Number, id and creation time stay.
    pub async fn update(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        input: UpdateOrder,
    ) -> ServiceResult<Order> {
        caller.require_admin("edit orders")?;
        if let Some(email) = &input.customer_email {
            if !looks_like_email(email) {
                return Err(invalid(format!("Invalid customer email '{email}'")));
            }
        }
        let order = OrderRepo::update(ctx.store(), id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        tracing::info!(order_id = %id, user_id = %caller.user_id, "Order updated");
        Ok(order)
    }

    pub async fn add_download_links(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        links: BTreeMap<DocId, String>,
    ) -> ServiceResult<Order> {
        caller.require_admin("attach download links")?;
        Self::check_links(ctx, id, &links).await?;
        let order = OrderRepo::add_download_links(ctx.store(), id, &links)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        tracing::info!(order_id = %id, count = links.len(), "Download links added");
        Ok(order)
    }

    pub async fn add_license_pdfs(
        ctx: &ServiceContext,
        caller: &Caller,
        id: &str,
        pdfs: BTreeMap<DocId, String>,
    ) -> ServiceResult<Order> {
        caller.require_admin("attach license PDFs")?;
        Self::check_links(ctx, id, &pdfs).await?;
        let order = OrderRepo::add_license_pdfs(ctx.store(), id, &pdfs)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        tracing::info!(order_id = %id, count = pdfs.len(), "License PDFs added");
        Ok(order)
    }

    pub async fn statistics(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<OrderStatistics> {
        caller.require_admin("view order statistics")?;
        let orders = OrderRepo::list_all(ctx.store()).await?;
        Ok(order_statistics(orders.iter().map(|o| (o.status, o.total))))
    }

    /// Purchased beats the caller can download, newest order first.
    pub async fn downloads(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<Vec<DownloadEntry>> {
        let orders = OrderRepo::completed_by_customer(ctx.store(), &caller.user_id).await?;
        Ok(orders.iter().flat_map(Order::downloads).collect())
    }

    /// Live admin listing.
    pub async fn subscribe_all(
        ctx: &ServiceContext,
        caller: &Caller,
        params: &OrderListParams,
    ) -> ServiceResult<Subscription> {
        caller.require_admin("watch orders")?;
        let query = OrderRepo::list_query(params);
        Ok(LiveQuery::new(ORDERS, query).start(ctx.store.clone()).await?)
    }

    /// Live view of one customer's orders.
    pub async fn subscribe_for_customer(
        ctx: &ServiceContext,
        caller: &Caller,
        customer_id: &str,
    ) -> ServiceResult<Subscription> {
        caller.require_owner_or_admin(customer_id, "watch these orders")?;
        let params = OrderListParams {
            customer_id: Some(customer_id.to_string()),
            ..Default::default()
        };
        let query = OrderRepo::list_query(&params);
        Ok(LiveQuery::new(ORDERS, query).start(ctx.store.clone()).await?)
    }

    /// Live view of a single order; the snapshot is empty once it is deleted.
    pub async fn subscribe_one(ctx: &ServiceContext, caller: &Caller, id: &str) -> ServiceResult<Subscription> {
        Self::get(ctx, caller, id).await?;
        let query = Query::new().where_eq("id", id).limit(1);
        Ok(LiveQuery::new(ORDERS, query).start(ctx.store.clone()).await?)
    }

    async fn allocate_order_number(ctx: &ServiceContext) -> ServiceResult<String> {
        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let candidate = ctx.next_order_number(Utc::now());
            if OrderRepo::reserve_number(ctx.store(), &candidate).await? {
                return Ok(candidate);
            }
            tracing::warn!(order_number = %candidate, "Order number collision, retrying");
        }
        Err(CoreError::Conflict("Could not allocate a unique order number".to_string()).into())
    }

    /// Links must be keyed by beats that are in the order.
    async fn check_links(
        ctx: &ServiceContext,
        id: &str,
        links: &BTreeMap<DocId, String>,
    ) -> ServiceResult<()> {
        if links.is_empty() {
            return Err(invalid("No links given".to_string()));
        }
        let order = OrderRepo::find_by_id(ctx.store(), id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        for (beat_id, url) in links {
            if !order.items.iter().any(|item| &item.beat_id == beat_id) {
                return Err(invalid(format!("Beat '{beat_id}' is not part of this order")));
            }
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(invalid(format!("Invalid URL for beat '{beat_id}'")));
            }
        }
        Ok(())
    }
}
