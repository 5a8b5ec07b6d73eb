//! Per-entity services for the beat store.
//!
//! Services are stateless unit structs. Every operation receives a
//! [`ServiceContext`] (store and event bus) and, for anything that is not a
//! public read, the [`Caller`](beatstore_core::session::Caller) it runs as.
//! Role checks happen before the store is touched.

pub mod analytics;
pub mod artist_requests;
pub mod beats;
pub mod chat;
pub mod collab_requests;
pub mod collaborations;
pub mod content;
pub mod context;
pub mod error;
pub mod orders;
pub mod settings;
pub mod uploads;
pub mod users;

pub use analytics::AnalyticsService;
pub use artist_requests::ArtistRoleRequestService;
pub use beats::BeatService;
pub use chat::ChatService;
pub use collab_requests::CollabRequestService;
pub use collaborations::CollaborationService;
pub use content::ContentService;
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use orders::OrderService;
pub use settings::SettingsService;
pub use uploads::{UploadProxy, UploadProxyError};
pub use users::UserService;
