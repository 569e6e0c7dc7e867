//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backing store rejected an operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// A session id that was not issued by [`SessionId::generate`](crate::SessionId::generate).
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
}
