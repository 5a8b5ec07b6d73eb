//! Request handlers, one module per resource.
//!
//! Handlers extract the caller, delegate to the matching service in
//! `beatstore_services` and wrap results in [`DataResponse`](crate::response::DataResponse).
//! Errors map to HTTP through [`AppError`](crate::error::AppError).

pub mod analytics;
pub mod artist_requests;
pub mod auth;
pub mod beats;
pub mod chat;
pub mod collab_requests;
pub mod collaborations;
pub mod content;
pub mod orders;
pub mod settings;
pub mod uploads;
pub mod users;
