//! Object store for profile photos.
//!
//! Each upload lands in its own file under the storage directory, named by a
//! fresh UUID. Clients only ever see the download URL.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServerError;

/// Resolve `target` under `base`, refusing anything that climbs out of it.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, ServerError> {
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let mut resolved = canonical_base.clone();
    for component in target.strip_prefix(base).unwrap_or(target).components() {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::ParentDir => {
                return Err(ServerError::BadRequest("Path traversal detected".to_string()));
            }
            _ => {}
        }
    }
    if !resolved.starts_with(&canonical_base) {
        return Err(ServerError::BadRequest("Path traversal detected".to_string()));
    }
    Ok(resolved)
}

#[derive(Debug, Clone)]
pub struct PhotoStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl PhotoStore {
    pub async fn new(
        base_path: PathBuf,
        public_base_url: String,
        max_size: usize,
    ) -> Result<Self, ServerError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ServerError::PhotoStorage(format!(
                "Failed to create photo directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Photo store initialized");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Where clients download the photo stored under `id`.
    pub fn download_url(&self, id: Uuid) -> String {
        format!("{}/photos/{}", self.public_base_url, id)
    }

    pub async fn store_photo(&self, data: &[u8]) -> Result<Uuid, ServerError> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Empty photo".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ServerError::PhotoTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let id = Uuid::new_v4();
        let path = self.photo_path(id)?;

        fs::write(&path, data)
            .await
            .map_err(|e| ServerError::PhotoStorage(format!("Failed to write photo {}: {}", id, e)))?;

        debug!(id = %id, size = data.len(), "Stored photo");
        Ok(id)
    }

    pub async fn get_photo(&self, id: Uuid) -> Result<Vec<u8>, ServerError> {
        let path = self.photo_path(id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ServerError::PhotoNotFound(id));
        }

        fs::read(&path)
            .await
            .map_err(|e| ServerError::PhotoStorage(format!("Failed to read photo {}: {}", id, e)))
    }

    fn photo_path(&self, id: Uuid) -> Result<PathBuf, ServerError> {
        ensure_within(&self.base_path, &self.base_path.join(id.to_string()))
    }
}
