use beatstore_core::error::CoreError;
use beatstore_db::StoreError;

use crate::uploads::UploadProxyError;

/// Errors returned by service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Upload service error: {0}")]
    Upstream(#[from] UploadProxyError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Shorthand for a `CoreError::Validation` from a validator message.
pub(crate) fn invalid(message: String) -> ServiceError {
    ServiceError::Core(CoreError::Validation(message))
}
