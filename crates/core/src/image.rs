//! Best-effort cleanup of stored asset images.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Image IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Removes the file behind a public image URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Remove `owner_id`'s image. URLs outside that owner's area of the
    /// store are ignored.
    async fn remove(&self, owner_id: DbId, url: &str) -> Result<(), ImageError>;
}

/// Images stored on local disk under `upload_dir` and served from
/// `public_base_url`.
///
/// Each owner's files live in their own directory, so a managed URL looks
/// like `{public_base_url}/{owner_id}/{file}`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    upload_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(upload_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Map a public URL onto a file inside `owner_id`'s upload directory.
    ///
    /// Returns `None` for URLs outside the public base, for files belonging
    /// to another owner, and for paths that would escape the upload
    /// directory.
    pub fn path_for_url(&self, owner_id: DbId, url: &str) -> Option<PathBuf> {
        let relative = url
            .strip_prefix(&self.public_base_url)?
            .strip_prefix('/')?;
        let relative = relative.split(['?', '#']).next().unwrap_or_default();

        let owner_dir = owner_id.to_string();
        let file = relative.strip_prefix(owner_dir.as_str())?.strip_prefix('/')?;
        if file.is_empty() {
            return None;
        }

        let file = Path::new(file);
        if !file.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.upload_dir.join(owner_dir).join(file))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn remove(&self, owner_id: DbId, url: &str) -> Result<(), ImageError> {
        let Some(path) = self.path_for_url(owner_id, url) else {
            tracing::debug!(owner_id, url, "Image URL not owned in local store, skipping");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed asset image");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Remove an image in the background; failures are logged and dropped.
pub fn spawn_cleanup(store: Arc<dyn ImageStore>, owner_id: DbId, url: String) {
    tokio::spawn(async move {
        if let Err(e) = store.remove(owner_id, &url).await {
            tracing::warn!(owner_id, url = %url, error = %e, "Asset image cleanup failed");
        }
    });
}
