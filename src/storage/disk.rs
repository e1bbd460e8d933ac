// Disk-backed media store. Files land under the configured root and are
// served back under the configured base URL by the HTTP layer.

use super::{MediaPath, MediaStore};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DiskMediaStore {
    root: PathBuf,
    base_url: String,
}

impl DiskMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl MediaStore for DiskMediaStore {
    async fn store(&self, path: &MediaPath, _content_type: &str, bytes: &[u8]) -> AppResult<()> {
        let target = self.root.join(path.as_str());
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Upload(format!("failed to prepare media dir: {}", e)))?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| AppError::Upload(format!("failed to store media: {}", e)))
    }

    fn public_url(&self, path: &MediaPath) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.as_str())
    }
}
