//! Per-user response cache for the category tree, the flat category list,
//! and the location list.
//!
//! The cache is advisory. Uniqueness and deletion checks always hit the
//! database; a cache failure only ever costs a recomputation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::types::DbId;

/// Default namespace prefix for cache keys.
pub const DEFAULT_NAMESPACE: &str = "inventra";

/// Default time-to-live for cached projections (15 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Which projection an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    CategoryTree,
    CategoryFlat,
    Locations,
}

impl CacheKind {
    /// Both category projections; invalidated together on any category write.
    pub const CATEGORIES: &'static [CacheKind] = &[CacheKind::CategoryTree, CacheKind::CategoryFlat];

    pub const LOCATIONS: &'static [CacheKind] = &[CacheKind::Locations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CategoryTree => "categories:tree",
            Self::CategoryFlat => "categories:flat",
            Self::Locations => "locations:all",
        }
    }
}

/// `"{namespace}:cache:{kind}:{user_id}"`.
pub fn cache_key(namespace: &str, kind: CacheKind, user_id: DbId) -> String {
    format!("{namespace}:cache:{}:{user_id}", kind.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage behind the response cache.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, user_id: DbId, kind: CacheKind) -> Result<Option<Value>, CacheError>;

    async fn put(
        &self,
        user_id: DbId,
        kind: CacheKind,
        value: Value,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    async fn invalidate(&self, user_id: DbId, kinds: &[CacheKind]) -> Result<(), CacheError>;

    /// Drop expired entries. Returns the number removed.
    async fn purge_expired(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

struct Entry {
    value: Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local cache with per-entry expiry.
///
/// Expired entries read as misses and are evicted on access; the rest are
/// swept by [`ResponseCache::purge_expired`].
pub struct InMemoryCache {
    namespace: String,
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn key(&self, kind: CacheKind, user_id: DbId) -> String {
        cache_key(&self.namespace, kind, user_id)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    async fn get(&self, user_id: DbId, kind: CacheKind) -> Result<Option<Value>, CacheError> {
        let key = self.key(kind, user_id);
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Re-check under the write lock; a fresh put may have landed.
        let mut entries = self.entries.write().await;
        if entries.get(&key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(&key);
        }
        Ok(None)
    }

    async fn put(
        &self,
        user_id: DbId,
        kind: CacheKind,
        value: Value,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = self.key(kind, user_id);
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key, entry);
        Ok(())
    }

    async fn invalidate(&self, user_id: DbId, kinds: &[CacheKind]) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        for kind in kinds {
            entries.remove(&self.key(*kind, user_id));
        }
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }
}

/// Backend used when caching is disabled: every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

#[async_trait]
impl ResponseCache for NoopCache {
    async fn get(&self, _user_id: DbId, _kind: CacheKind) -> Result<Option<Value>, CacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _user_id: DbId,
        _kind: CacheKind,
        _value: Value,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn invalidate(&self, _user_id: DbId, _kinds: &[CacheKind]) -> Result<(), CacheError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed helper used by the services
// ---------------------------------------------------------------------------

/// Typed, failure-swallowing front for a [`ResponseCache`].
///
/// Cheap to clone; shared by every service through the app state.
#[derive(Clone)]
pub struct CachedProjection {
    store: Arc<dyn ResponseCache>,
    ttl: Duration,
}

impl CachedProjection {
    pub fn new(store: Arc<dyn ResponseCache>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// A projection backed by [`NoopCache`].
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCache), DEFAULT_TTL)
    }

    pub fn store(&self) -> Arc<dyn ResponseCache> {
        Arc::clone(&self.store)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read and decode a cached projection. Errors and decode failures are
    /// logged and reported as a miss.
    pub async fn get_typed<T: DeserializeOwned>(&self, user_id: DbId, kind: CacheKind) -> Option<T> {
        let value = match self.store.get(user_id, kind).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(user_id, kind = kind.as_str(), error = %e, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(typed) => {
                tracing::debug!(user_id, kind = kind.as_str(), "Cache hit");
                Some(typed)
            }
            Err(e) => {
                tracing::warn!(user_id, kind = kind.as_str(), error = %e, "Cached value failed to decode");
                None
            }
        }
    }

    /// Store a projection in the background. Never fails the caller.
    pub fn spawn_put<T: Serialize>(&self, user_id: DbId, kind: CacheKind, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(user_id, kind = kind.as_str(), error = %e, "Failed to serialize projection for cache");
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let ttl = self.ttl;
        tokio::spawn(async move {
            if let Err(e) = store.put(user_id, kind, value, ttl).await {
                tracing::warn!(user_id, kind = kind.as_str(), error = %e, "Cache write failed");
            }
        });
    }

    /// Drop the given projections for a user. Failures are logged only.
    pub async fn invalidate(&self, user_id: DbId, kinds: &[CacheKind]) {
        if let Err(e) = self.store.invalidate(user_id, kinds).await {
            tracing::warn!(user_id, error = %e, "Cache invalidation failed");
        }
    }
}
