//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&dyn DocumentStore` as the first argument.

pub mod artist_request_repo;
pub mod beat_repo;
pub mod collab_request_repo;
pub mod collaboration_repo;
pub mod content_repo;
pub mod credential_repo;
pub mod event_repo;
pub mod order_repo;
pub mod session_repo;
pub mod settings_repo;
pub mod support_message_repo;
pub mod user_repo;

pub use artist_request_repo::ArtistRoleRequestRepo;
pub use beat_repo::{BeatCounter, BeatRepo};
pub use collab_request_repo::CollabRequestRepo;
pub use collaboration_repo::CollaborationRepo;
pub use content_repo::{ContentCounter, ContentRepo};
pub use credential_repo::CredentialRepo;
pub use event_repo::EventRepo;
pub use order_repo::OrderRepo;
pub use session_repo::{PasswordResetRepo, SessionRepo};
pub use settings_repo::SettingsRepo;
pub use support_message_repo::SupportMessageRepo;
pub use user_repo::UserRepo;
