//! Wishlist storage backends.

use furnish_cache::{Cache, Session, SessionId};
use furnish_commerce::wishlist::{WishlistStorage, WISHLIST_STORAGE_KEY};
use furnish_commerce::{CommerceError, ProductId};
use std::path::{Path, PathBuf};

/// Wishlist kept as a flat JSON list in `<dir>/wishlist.json`.
#[derive(Debug, Clone)]
pub struct FileWishlistStorage {
    path: PathBuf,
}

impl FileWishlistStorage {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", WISHLIST_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WishlistStorage for FileWishlistStorage {
    fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&self.path, e)),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let content = serde_json::to_string(ids)?;
        std::fs::write(&self.path, content).map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> CommerceError {
    CommerceError::Storage(format!("{}: {}", path.display(), e))
}

/// Wishlist of one browser session, kept in the key-value cache.
pub struct SessionWishlistStorage {
    sessions: Session<Vec<ProductId>>,
    session_id: SessionId,
}

impl SessionWishlistStorage {
    pub fn new(cache: Cache, session_id: SessionId) -> Self {
        Self {
            sessions: Session::new(cache, WISHLIST_STORAGE_KEY),
            session_id,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

impl WishlistStorage for SessionWishlistStorage {
    fn load(&self) -> Result<Option<Vec<ProductId>>, CommerceError> {
        self.sessions
            .get(&self.session_id)
            .map_err(|e| CommerceError::Storage(e.to_string()))
    }

    fn save(&self, ids: &[ProductId]) -> Result<(), CommerceError> {
        self.sessions
            .set(&self.session_id, &ids.to_vec())
            .map_err(|e| CommerceError::Storage(e.to_string()))
    }
}
