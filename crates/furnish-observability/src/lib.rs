//! Observability for the FurnishAI storefront.
//!
//! This crate provides:
//! - `RequestId` - Unique identifier used to correlate log lines
//! - `StructuredLogger` - Structured logging with request context
//! - `LogBuilder` - Fluent construction of entries with typed fields

mod logging;
mod request;

pub use logging::*;
pub use request::*;
