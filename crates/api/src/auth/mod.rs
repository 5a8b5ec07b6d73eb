//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access tokens and opaque refresh / reset tokens.

pub mod jwt;
pub mod password;
