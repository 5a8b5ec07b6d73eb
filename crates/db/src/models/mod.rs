//! Document models and DTOs.
//!
//! Each submodule contains:
//! - A `Deserialize` + `Serialize` model decoded from a stored document
//! - `Deserialize` create/update DTOs accepted from callers
//! - A `Serialize` `New*` shape written on insert, where it differs from the DTO

pub mod artist_request;
pub mod beat;
pub mod collab_request;
pub mod collaboration;
pub mod content;
pub mod event;
pub mod order;
pub mod settings;
pub mod support_message;
pub mod user;
