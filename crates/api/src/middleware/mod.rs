//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the signed-in user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- same, but optional for public reads.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireArtist`] -- requires `artist` or `admin`.
//! - [`rbac::RequireAuth`] -- requires any signed-in user.

pub mod auth;
pub mod rbac;
