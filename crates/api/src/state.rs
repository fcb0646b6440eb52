use std::sync::Arc;

use inventra_core::cache::{CachedProjection, InMemoryCache, ResponseCache};
use inventra_core::image::{ImageStore, LocalImageStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inventra_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Per-user cache of the category and location projections.
    pub cache: CachedProjection,
    /// Removes asset images once their asset is deleted.
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Build the state with the cache and image store the config asks for.
    pub fn new(pool: inventra_db::DbPool, config: ServerConfig) -> Self {
        let cache = if config.cache.enabled {
            let store: Arc<dyn ResponseCache> =
                Arc::new(InMemoryCache::new(config.cache.namespace.clone()));
            CachedProjection::new(store, config.cache.ttl())
        } else {
            CachedProjection::disabled()
        };

        let images: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(
            config.storage.upload_dir.clone(),
            config.storage.public_base_url.clone(),
        ));

        Self {
            pool,
            config: Arc::new(config),
            cache,
            images,
        }
    }
}
