//! Key-value cache and browser sessions for the FurnishAI storefront.
//!
//! Values are stored as JSON. Inside a Spin component the cache is backed by
//! the component's key-value store; everywhere else it is an in-process map.
//!
//! # Example
//!
//! ```rust,ignore
//! use furnish_cache::{Cache, Session, SessionId};
//!
//! let sessions = Session::<Vec<String>>::new(Cache::open_default()?, "wishlist");
//! let id = SessionId::generate();
//! sessions.update(&id, |ids| ids.push("42".to_string()))?;
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Session, SessionId};
}
