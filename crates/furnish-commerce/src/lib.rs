//! Storefront domain types and logic for FurnishAI.
//!
//! - **Catalog**: products, reviews, categories and the upstream wire format
//! - **Search**: client-side search/category filter and page slicing
//! - **Wishlist**: ordered set of favorited product ids with pluggable storage
//! - **Assistant**: conversation transcript returned by the search service
//!
//! # Example
//!
//! ```rust,ignore
//! use furnish_commerce::prelude::*;
//!
//! let filter = CatalogFilter::new("oak").with_category(Category::Tables);
//! let visible = filter.apply(&products);
//! let page = paginate(&products, 2, 10);
//! println!("page {} of {}", page.current_page, page.total_pages);
//! ```

pub mod error;
pub mod ids;

pub mod assistant;
pub mod catalog;
pub mod search;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;

    // Catalog
    pub use crate::catalog::{ApiProduct, Category, Product, ProductsPage, Review};

    // Search
    pub use crate::search::{paginate, CatalogFilter, CategoryFilter, Page};

    // Wishlist
    pub use crate::wishlist::{
        MemoryWishlistStorage, Wishlist, WishlistChange, WishlistStorage, WishlistStore,
    };

    // Assistant
    pub use crate::assistant::{Author, Conversation, ConversationEntry, SearchResult, Snapshot};
}
