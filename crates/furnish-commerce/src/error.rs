//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Wishlist storage could not be read or written.
    #[error("Wishlist storage error: {0}")]
    Storage(String),

    /// A conversation entry did not match the expected shape.
    #[error("Invalid conversation entry at index {index}: {reason}")]
    InvalidConversationEntry { index: usize, reason: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
