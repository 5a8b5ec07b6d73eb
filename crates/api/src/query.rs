//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for endpoints returning a bounded list.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

/// `?status=` for review queues (collab and artist requests).
#[derive(Debug, Default, Deserialize)]
pub struct RequestStatusParams {
    pub status: Option<beatstore_core::status::RequestStatus>,
}

/// `?role=` for user and inbox listings.
#[derive(Debug, Default, Deserialize)]
pub struct RoleParams {
    pub role: Option<beatstore_core::roles::Role>,
    pub search: Option<String>,
}
