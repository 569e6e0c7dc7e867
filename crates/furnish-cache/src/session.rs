//! Browser sessions stored in the key-value cache.

use crate::{cache_key, Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const SESSION_PREFIX: &str = "sess_";
/// Random bytes per session id (24 base64 characters).
const SESSION_ID_BYTES: usize = 18;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an id without validation, for ids the server issued itself.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; SESSION_ID_BYTES] = rand::thread_rng().gen();
        Self(format!("{}{}", SESSION_PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Accept an id presented by a client, e.g. from a cookie.
    ///
    /// Only ids shaped like the ones [`generate`](Self::generate) issues are
    /// accepted, so a client cannot address arbitrary cache keys.
    pub fn parse(raw: &str) -> Result<Self, CacheError> {
        let token = raw
            .strip_prefix(SESSION_PREFIX)
            .ok_or_else(|| CacheError::InvalidSessionId(raw.to_string()))?;

        let well_formed = token.len() == 24
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(CacheError::InvalidSessionId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stored session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds.
    pub last_accessed: u64,
}

/// Per-session values of type `T` under a namespace.
///
/// Each namespace keeps its own record per session, so several features can
/// share one session id without clobbering each other.
pub struct Session<T> {
    cache: Cache,
    namespace: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(cache: Cache, namespace: impl Into<String>) -> Self {
        Self {
            cache,
            namespace: namespace.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Session data, creating a default record when none exists.
    pub fn get_or_create(&self, id: &SessionId) -> Result<T, CacheError> {
        match self.get_versioned(id)? {
            Some(record) => Ok(record.data),
            None => {
                let data = T::default();
                self.write(id, &data, None)?;
                Ok(data)
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|record| record.data))
    }

    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Replace session data.
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let previous = self.get_versioned(id)?;
        self.write(id, data, previous.as_ref())
    }

    /// Read-modify-write with a closure. Missing sessions start from
    /// `T::default()`.
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&mut T),
    {
        let previous = self.get_versioned(id)?;
        let mut data = previous
            .as_ref()
            .map(|record| record.data.clone())
            .unwrap_or_default();
        f(&mut data);
        self.write(id, &data, previous.as_ref())?;
        Ok(data)
    }

    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.session_key(id))
    }

    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&self.session_key(id))
    }

    fn write(
        &self,
        id: &SessionId,
        data: &T,
        previous: Option<&SessionData<T>>,
    ) -> Result<(), CacheError> {
        let now = unix_now();
        let record = SessionData {
            id: id.clone(),
            data: data.clone(),
            version: previous.map(|p| p.version + 1).unwrap_or(1),
            created_at: previous.map(|p| p.created_at).unwrap_or(now),
            last_accessed: now,
        };
        self.cache.set(&self.session_key(id), &record)
    }

    fn session_key(&self, id: &SessionId) -> String {
        cache_key!("session", self.namespace, id)
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
