pub mod auth;
pub mod beats;
pub mod chat;
pub mod collaborations;
pub mod content;
pub mod health;
pub mod orders;
pub mod settings;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                                    create account (public)
/// /auth/sign-in                                    sign in (public)
/// /auth/refresh                                    rotate tokens (public)
/// /auth/sign-out                                   revoke sessions
/// /auth/me                                         profile + dashboard route
/// /auth/profile                                    update own profile (PUT)
/// /auth/password                                   change password (PUT)
/// /auth/password-reset                             request reset (public)
/// /auth/password-reset/confirm                     confirm reset (public)
///
/// /beats                                           list, create
/// /beats/browse                                    storefront search
/// /beats/featured, /beats/trending, /beats/genres  storefront shelves
/// /beats/live                                      live listing (SSE)
/// /beats/{id}                                      get, update, delete
/// /beats/{id}/play|download|like                   counters (POST)
///
/// /orders                                          list (admin), place
/// /orders/quote                                    price a cart (POST)
/// /orders/live, /orders/recent, /orders/statistics admin views
/// /orders/mine, /orders/mine/live                  customer views
/// /orders/downloads                                purchased downloads
/// /orders/by-number/{order_number}                 lookup by number
/// /orders/{id}                                     get, update (admin)
/// /orders/{id}/live                                live single order (SSE)
/// /orders/{id}/status                              change status (PUT, admin)
/// /orders/{id}/download-links|license-pdfs         attach files (POST, admin)
///
/// /content                                         list, create
/// /content/published, /content/featured            public feeds
/// /content/live                                    live listing (SSE)
/// /content/slug/{slug}                             get by slug
/// /content/{id}                                    get, update, delete
/// /content/{id}/view|like|share                    counters (POST)
///
/// /collaborations                                  list, create (admin)
/// /collaborations/live, /collaborations/stats      admin views
/// /collaborations/mine, /collaborations/mine/live  artist views
/// /collaborations/{id}                             get, update, delete
/// /collaborations/{id}/status                      pipeline transition (PUT)
/// /collaborations/{id}/payments                    record payment (POST)
///
/// /collab-requests                                 list (admin), submit (artist)
/// /collab-requests/mine                            own requests
/// /collab-requests/{id}                            delete (admin)
/// /collab-requests/{id}/approve|reject             review (POST, admin)
///
/// /artist-requests                                 list (admin), apply
/// /artist-requests/mine                            own applications
/// /artist-requests/{id}/approve|reject             review (POST, admin)
///
/// /chat/messages                                   send (POST)
/// /chat/thread, /chat/thread/live                  own thread
/// /chat/threads/{user_id}[/live]                   user thread
/// /chat/conversations, /chat/inbox/live            admin inbox
///
/// /settings/shop/public                            storefront settings
/// /settings/{shop,general,notifications,security}  get, save (admin)
///
/// /users                                           list (admin)
/// /users/{id}                                      get, update profile
/// /users/{id}/role                                 change role (PUT, admin)
/// /users/{id}/orders                               customer orders
///
/// /analytics                                       overview (admin)
///
/// /uploads                                         upload file (multipart)
/// /uploads/delete                                  delete file (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and account management.
        .nest("/auth", auth::router())
        // Storefront catalog.
        .nest("/beats", beats::router())
        // Checkout, fulfilment and reporting.
        .nest("/orders", orders::router())
        // Editorial content.
        .nest("/content", content::router())
        // Collaboration pipeline and the requests feeding it.
        .nest("/collaborations", collaborations::router())
        .nest("/collab-requests", collaborations::requests_router())
        .nest("/artist-requests", collaborations::artist_requests_router())
        // Support chat.
        .nest("/chat", chat::router())
        // Site settings sections.
        .nest("/settings", settings::router())
        // Profiles, roles and admin analytics.
        .nest("/users", users::router())
        .nest("/analytics", users::analytics_router())
        // Upload proxy.
        .nest("/uploads", uploads::router())
}
