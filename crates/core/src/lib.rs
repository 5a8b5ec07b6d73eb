//! Domain rules for the beat storefront. No I/O lives here.

pub mod error;
pub mod status;
pub mod types;

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod collaboration;
pub mod content;
pub mod order_number;
pub mod pricing;
pub mod roles;
pub mod session;
pub mod settings;
pub mod statistics;
pub mod uploads;
