//! Key-value store wrapper with JSON serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Backend {
    #[cfg(target_arch = "wasm32")]
    Spin(Arc<spin_sdk::key_value::Store>),
    Memory(Arc<Mutex<BTreeMap<String, Vec<u8>>>>),
}

/// Typed cache over a key-value backend.
///
/// Clones share the same backend.
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(_) => "spin",
            Backend::Memory(_) => "memory",
        };
        f.debug_struct("Cache").field("backend", &backend).finish()
    }
}

impl Cache {
    /// A cache held in process memory.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(BTreeMap::new()))),
        }
    }

    /// Open the default store: the Spin store inside a component, an
    /// in-memory map otherwise.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(Arc::new(store)),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::in_memory())
    }

    /// Open a named store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(Arc::new(store)),
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> Result<Self, CacheError> {
        Ok(Self::in_memory())
    }

    /// Get a value, `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_raw(key, bytes)
    }

    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .delete(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
        }
    }

    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .exists(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
        }
    }

    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get_keys()
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.keys().cloned().collect()),
        }
    }

    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
        }
    }

    fn set_raw(&self, key: &str, bytes: Vec<u8>) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .set(key, &bytes)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes);
                Ok(())
            }
        }
    }
}

fn lock(
    map: &Mutex<BTreeMap<String, Vec<u8>>>,
) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>, CacheError> {
    map.lock()
        .map_err(|e| CacheError::StoreError(e.to_string()))
}

/// Build a namespaced cache key.
///
/// ```rust,ignore
/// let key = cache_key!("session", "wishlist", session_id);
/// // "session:wishlist:sess_..."
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
