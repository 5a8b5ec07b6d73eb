//! Route definitions for the `/orders` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// GET    /                          -> list_orders (admin)
/// POST   /                          -> create_order
/// POST   /quote                     -> quote_cart
/// GET    /live                      -> watch_orders (admin, SSE)
/// GET    /recent                    -> recent_orders (admin)
/// GET    /statistics                -> order_statistics (admin)
/// GET    /mine                      -> my_orders
/// GET    /mine/live                 -> watch_my_orders (SSE)
/// GET    /downloads                 -> my_downloads
/// GET    /by-number/{order_number}  -> get_order_by_number
/// GET    /{id}                      -> get_order
/// PUT    /{id}                      -> update_order (admin)
/// GET    /{id}/live                 -> watch_order (SSE)
/// PUT    /{id}/status               -> update_order_status (admin)
/// POST   /{id}/download-links       -> add_download_links (admin)
/// POST   /{id}/license-pdfs         -> add_license_pdfs (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/quote", post(orders::quote_cart))
        .route("/live", get(orders::watch_orders))
        .route("/recent", get(orders::recent_orders))
        .route("/statistics", get(orders::order_statistics))
        .route("/mine", get(orders::my_orders))
        .route("/mine/live", get(orders::watch_my_orders))
        .route("/downloads", get(orders::my_downloads))
        .route("/by-number/{order_number}", get(orders::get_order_by_number))
        .route("/{id}", get(orders::get_order).put(orders::update_order))
        .route("/{id}/live", get(orders::watch_order))
        .route("/{id}/status", put(orders::update_order_status))
        .route("/{id}/download-links", post(orders::add_download_links))
        .route("/{id}/license-pdfs", post(orders::add_license_pdfs))
}
