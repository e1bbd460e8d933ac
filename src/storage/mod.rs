// Media upload boundary. Size and type gating happen here, before any store
// call; paths are namespaced by owner and timestamp so uploads never collide.

pub mod disk;

use crate::core::{current_time_millis, UserId};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

pub use disk::DiskMediaStore;

/// Fixed upload size cap: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").unwrap());

/// Reject anything that is not an image, empty, or above the size cap.
pub fn validate_upload(content_type: &str, len: usize) -> AppResult<()> {
    if !content_type.starts_with("image/") {
        return Err(AppError::Upload(
            "only image uploads are accepted".to_string(),
        ));
    }
    if len == 0 {
        return Err(AppError::Upload("upload is empty".to_string()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(AppError::Upload(
            "image must be smaller than 5MB".to_string(),
        ));
    }
    Ok(())
}

/// A relative object path inside the media store, safe by construction:
/// `{kind}/{owner}-{millis}.{ext}` with the extension whitelisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPath(String);

impl MediaPath {
    pub fn avatar(owner: UserId, file_name: &str) -> Self {
        Self::namespaced("avatars", owner, file_name)
    }

    pub fn post_image(owner: UserId, file_name: &str) -> Self {
        Self::namespaced("posts", owner, file_name)
    }

    fn namespaced(kind: &str, owner: UserId, file_name: &str) -> Self {
        let ext = file_name
            .rsplit('.')
            .next()
            .filter(|ext| EXTENSION.is_match(ext))
            .unwrap_or("bin");
        MediaPath(format!(
            "{}/{}-{}.{}",
            kind,
            owner,
            current_time_millis(),
            ext.to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Object storage seam: write a blob, hand back a public URL.
#[async_trait]
pub trait MediaStore: Send + Sync + std::fmt::Debug {
    async fn store(&self, path: &MediaPath, content_type: &str, bytes: &[u8]) -> AppResult<()>;
    fn public_url(&self, path: &MediaPath) -> String;
}

/// Gated upload front: validates, stores, returns the public URL.
#[derive(Debug, Clone)]
pub struct ImageUploader {
    store: Arc<dyn MediaStore>,
}

impl ImageUploader {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    pub async fn upload_avatar(
        &self,
        owner: UserId,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        validate_upload(content_type, bytes.len())?;
        let path = MediaPath::avatar(owner, file_name);
        self.store.store(&path, content_type, bytes).await?;
        Ok(self.store.public_url(&path))
    }

    pub async fn upload_post_image(
        &self,
        owner: UserId,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> AppResult<String> {
        validate_upload(content_type, bytes.len())?;
        let path = MediaPath::post_image(owner, file_name);
        self.store.store(&path, content_type, bytes).await?;
        Ok(self.store.public_url(&path))
    }
}
