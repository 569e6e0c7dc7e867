//! Catalog search and pagination.

mod filter;
mod pagination;

pub use filter::{CatalogFilter, CategoryFilter};
pub use pagination::{paginate, Page};
