//! Wishlist store backed by pluggable persistent storage.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::wishlist::Wishlist;
use furnish_observability::StructuredLogger;
use std::sync::Mutex;

/// Storage key the wishlist is persisted under.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Persistent storage for a single client's wishlist.
pub trait WishlistStorage {
    /// Read the persisted ids, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError>;

    /// Replace the persisted ids.
    fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError>;
}

impl<S: WishlistStorage + ?Sized> WishlistStorage for &S {
    fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError> {
        (**self).load()
    }

    fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError> {
        (**self).save(ids)
    }
}

/// In-process storage, for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct MemoryWishlistStorage {
    saved: Mutex<Option<Vec<ProductId>>>,
}

impl MemoryWishlistStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: Vec<ProductId>) -> Self {
        Self {
            saved: Mutex::new(Some(ids)),
        }
    }

    /// What was last saved.
    pub fn saved(&self) -> Option<Vec<ProductId>> {
        self.saved.lock().ok().and_then(|saved| saved.clone())
    }
}

impl WishlistStorage for MemoryWishlistStorage {
    fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError> {
        let saved = self
            .saved
            .lock()
            .map_err(|e| CommerceError::Storage(e.to_string()))?;
        Ok(saved.clone())
    }

    fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| CommerceError::Storage(e.to_string()))?;
        *saved = Some(ids.to_vec());
        Ok(())
    }
}

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    Added,
    Removed,
}

impl WishlistChange {
    /// Confirmation shown to the shopper.
    pub fn notice(&self) -> &'static str {
        match self {
            WishlistChange::Added => "Added to wishlist!",
            WishlistChange::Removed => "Removed from wishlist.",
        }
    }
}

/// A wishlist kept in sync with its storage.
///
/// The list is rehydrated once at construction. Storage failures are logged
/// and never surface to the caller: a failed load starts empty and a failed
/// save leaves the in-memory list as the source of truth.
pub struct WishlistStore<S: WishlistStorage> {
    storage: S,
    wishlist: Wishlist,
    logger: StructuredLogger,
}

impl<S: WishlistStorage> WishlistStore<S> {
    pub fn new(storage: S, logger: StructuredLogger) -> Self {
        let wishlist = match storage.load() {
            Ok(Some(ids)) => Wishlist::from(ids),
            Ok(None) => Wishlist::new(),
            Err(e) => {
                logger
                    .error_builder("Failed to load wishlist")
                    .field("key", WISHLIST_STORAGE_KEY)
                    .field("error", e.to_string())
                    .emit();
                Wishlist::new()
            }
        };

        Self {
            storage,
            wishlist,
            logger,
        }
    }

    /// Add a product. Persists only when the list changed.
    pub fn add(&mut self, id: ProductId) -> bool {
        let added = self.wishlist.add(id);
        if added {
            self.persist();
        }
        added
    }

    /// Remove a product. Always persists.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let removed = self.wishlist.remove(id);
        self.persist();
        removed
    }

    pub fn toggle(&mut self, id: ProductId) -> WishlistChange {
        if self.wishlist.contains(&id) {
            self.remove(&id);
            WishlistChange::Removed
        } else {
            self.add(id);
            WishlistChange::Added
        }
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.wishlist.contains(id)
    }

    pub fn ids(&self) -> &[ProductId] {
        self.wishlist.ids()
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn len(&self) -> usize {
        self.wishlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wishlist.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(self.wishlist.ids()) {
            self.logger
                .error_builder("Failed to save wishlist")
                .field("key", WISHLIST_STORAGE_KEY)
                .field("error", e.to_string())
                .emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn logger() -> StructuredLogger {
        StructuredLogger::default().with_component("wishlist")
    }

    /// Counts saves and can be told to fail.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryWishlistStorage,
        saves: Cell<usize>,
        fail_load: bool,
        fail_save: bool,
    }

    impl WishlistStorage for CountingStorage {
        fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError> {
            if self.fail_load {
                return Err(CommerceError::Storage("corrupt".to_string()));
            }
            self.inner.load()
        }

        fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError> {
            self.saves.set(self.saves.get() + 1);
            if self.fail_save {
                return Err(CommerceError::Storage("quota".to_string()));
            }
            self.inner.save(ids)
        }
    }

    #[test]
    fn test_rehydrates_saved_ids() {
        let storage = MemoryWishlistStorage::with_ids(vec!["4".into(), "2".into()]);
        let store = WishlistStore::new(&storage, logger());
        assert_eq!(store.len(), 2);
        assert!(store.contains(&"4".into()));
    }

    #[test]
    fn test_load_failure_starts_empty() {
        let storage = CountingStorage {
            fail_load: true,
            ..Default::default()
        };
        let store = WishlistStore::new(storage, logger());
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_add_does_not_persist() {
        let storage = CountingStorage::default();
        let mut store = WishlistStore::new(storage, logger());
        assert!(store.add("1".into()));
        assert!(!store.add("1".into()));
        assert_eq!(store.storage().saves.get(), 1);
        assert_eq!(store.storage().inner.saved(), Some(vec!["1".into()]));
    }

    #[test]
    fn test_remove_always_persists() {
        let storage = CountingStorage::default();
        let mut store = WishlistStore::new(storage, logger());
        assert!(!store.remove(&"9".into()));
        assert_eq!(store.storage().saves.get(), 1);
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let storage = CountingStorage {
            fail_save: true,
            ..Default::default()
        };
        let mut store = WishlistStore::new(storage, logger());
        store.add("1".into());
        assert!(store.contains(&"1".into()));
        assert_eq!(store.storage().inner.saved(), None);
    }

    #[test]
    fn test_toggle_notices() {
        let storage = MemoryWishlistStorage::new();
        let mut store = WishlistStore::new(&storage, logger());

        let change = store.toggle("5".into());
        assert_eq!(change, WishlistChange::Added);
        assert_eq!(change.notice(), "Added to wishlist!");

        let change = store.toggle("5".into());
        assert_eq!(change, WishlistChange::Removed);
        assert_eq!(change.notice(), "Removed from wishlist.");
        assert_eq!(storage.saved(), Some(vec![]));
    }
}
