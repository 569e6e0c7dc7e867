//! Product catalog module.
//!
//! Contains the storefront product view, reviews, categories and the
//! upstream product API wire types.

mod api;
mod category;
mod product;

pub use api::{ApiProduct, ProductsPage};
pub use category::Category;
pub use product::{Product, Review, PLACEHOLDER_IMAGE_URL};
