//! Storefront service errors.

use furnish_cache::CacheError;
use furnish_commerce::CommerceError;
use furnish_data::FetchError;
use thiserror::Error;

/// Errors returned by the storefront services.
#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The assistant never answered within the poll budget.
    #[error("No reply from the assistant after {attempts} attempts")]
    NoReply { attempts: u32 },

    #[error("Invalid document id: {0:?}")]
    InvalidDocumentId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An upstream document or payload had an unexpected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorefrontError {
    fn from(e: serde_json::Error) -> Self {
        StorefrontError::Malformed(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
