//! Handlers for the `/orders` resource.
//!
//! Customers place and read their own orders; listing everything, status
//! changes and fulfilment attachments are admin-only.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use beatstore_core::types::DocId;
use beatstore_db::models::order::{
    CreateOrder, OrderLine, OrderListParams, UpdateOrder, UpdateOrderStatus,
};
use beatstore_services::OrderService;

use crate::error::AppResult;
use crate::live::snapshot_stream;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 100;

/// Request body for `POST /orders/quote`.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub items: Vec<OrderLine>,
}

/// Request body for attaching per-beat URLs, keyed by beat id.
#[derive(Debug, Deserialize)]
pub struct AttachLinks {
    pub links: BTreeMap<DocId, String>,
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// POST /api/v1/orders/quote
///
/// Price a cart against the catalog without placing an order.
pub async fn quote_cart(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<QuoteRequest>,
) -> AppResult<impl IntoResponse> {
    let quote = OrderService::quote(&state.ctx, &input.items).await?;
    Ok(Json(DataResponse { data: quote }))
}

/// POST /api/v1/orders
///
/// Place an order for the signed-in customer. Prices come from the catalog.
pub async fn create_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::create(&state.ctx, &auth.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

// ---------------------------------------------------------------------------
// Customer reads
// ---------------------------------------------------------------------------

/// GET /api/v1/orders/mine
pub async fn my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let orders = OrderService::list_for_customer(&state.ctx, &auth.caller(), &auth.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/mine/live
pub async fn watch_my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription =
        OrderService::subscribe_for_customer(&state.ctx, &auth.caller(), &auth.user_id).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/orders/downloads
///
/// Beats the customer can download from completed orders.
pub async fn my_downloads(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let downloads = OrderService::downloads(&state.ctx, &auth.caller()).await?;
    Ok(Json(DataResponse { data: downloads }))
}

/// GET /api/v1/orders/{id}
pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::get(&state.ctx, &auth.caller(), &id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// GET /api/v1/orders/by-number/{order_number}
pub async fn get_order_by_number(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::get_by_number(&state.ctx, &auth.caller(), &order_number).await?;
    Ok(Json(DataResponse { data: order }))
}

/// GET /api/v1/orders/{id}/live
pub async fn watch_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let subscription = OrderService::subscribe_one(&state.ctx, &auth.caller(), &id).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/users/{id}/orders
///
/// Orders of one customer, for that customer or an admin.
pub async fn customer_orders(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let orders = OrderService::list_for_customer(&state.ctx, &auth.caller(), &customer_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/orders
///
/// All orders, filtered by `status` / `customerId`, ordered by `orderBy` and
/// `direction`, capped by `limit`.
pub async fn list_orders(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<impl IntoResponse> {
    let orders = OrderService::list(&state.ctx, &admin.caller(), &params).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/live
pub async fn watch_orders(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<impl IntoResponse> {
    let subscription = OrderService::subscribe_all(&state.ctx, &admin.caller(), &params).await?;
    Ok(snapshot_stream(subscription))
}

/// GET /api/v1/orders/recent
pub async fn recent_orders(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);
    let orders = OrderService::recent(&state.ctx, &admin.caller(), limit).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/statistics
pub async fn order_statistics(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = OrderService::statistics(&state.ctx, &admin.caller()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// PUT /api/v1/orders/{id}/status
///
/// Moving to `completed` stamps `completedAt` the first time.
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::update_status(&state.ctx, &admin.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/orders/{id}
pub async fn update_order(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrder>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::update(&state.ctx, &admin.caller(), &id, input).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders/{id}/download-links
pub async fn add_download_links(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AttachLinks>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::add_download_links(&state.ctx, &admin.caller(), &id, input.links).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders/{id}/license-pdfs
pub async fn add_license_pdfs(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AttachLinks>,
) -> AppResult<impl IntoResponse> {
    let order = OrderService::add_license_pdfs(&state.ctx, &admin.caller(), &id, input.links).await?;
    Ok(Json(DataResponse { data: order }))
}
