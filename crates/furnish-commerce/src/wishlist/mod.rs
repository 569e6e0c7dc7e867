//! Wishlist module.
//!
//! Contains the ordered id set and the store that keeps it in sync with
//! persistent storage.

mod list;
mod store;

pub use list::Wishlist;
pub use store::{
    MemoryWishlistStorage, WishlistChange, WishlistStorage, WishlistStore, WISHLIST_STORAGE_KEY,
};
