//! Periodic housekeeping: sweep expired cache entries and delete dead
//! refresh-token sessions.

use std::sync::Arc;
use std::time::Duration;

use inventra_core::cache::ResponseCache;
use inventra_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Run the housekeeping loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    cache: Arc<dyn ResponseCache>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Maintenance job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Maintenance job stopping");
                break;
            }
            _ = ticker.tick() => {
                sweep(&pool, cache.as_ref()).await;
            }
        }
    }
}

/// One pass. Failures are logged; the next tick tries again.
pub async fn sweep(pool: &PgPool, cache: &dyn ResponseCache) {
    match cache.purge_expired().await {
        Ok(0) => tracing::debug!("Maintenance: no expired cache entries"),
        Ok(purged) => tracing::info!(purged, "Maintenance: purged expired cache entries"),
        Err(e) => tracing::warn!(error = %e, "Maintenance: cache purge failed"),
    }

    match SessionRepo::cleanup_expired(pool).await {
        Ok(0) => tracing::debug!("Maintenance: no dead sessions"),
        Ok(deleted) => tracing::info!(deleted, "Maintenance: deleted dead sessions"),
        Err(e) => tracing::error!(error = %e, "Maintenance: session cleanup failed"),
    }
}
