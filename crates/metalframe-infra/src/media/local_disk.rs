//! Local disk media store - images saved under an upload directory.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use metalframe_core::domain::ImageUpload;
use metalframe_core::ports::{MediaError, MediaStore};

/// URL prefix under which the server exposes the upload directory.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Extensions kept on stored files. Anything else is refused so the upload
/// directory never serves markup or scripts.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif", "bmp"];

/// Stores each image as `<root>/<uuid>.<ext>` and returns `/uploads/<file>`.
pub struct LocalDiskMediaStore {
    root: PathBuf,
}

impl LocalDiskMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        tracing::info!(dir = %root.display(), "Using local disk media store");
        Self { root }
    }

    /// Map a URL produced by this store back to its file.
    /// Anything else, including paths that try to leave the root, maps to `None`.
    fn file_for_url(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(UPLOADS_URL_PREFIX)?;
        let valid = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        valid.then(|| self.root.join(name))
    }
}

#[async_trait]
impl MediaStore for LocalDiskMediaStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError> {
        let file_name = match image.extension() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => {
                format!("{}.{}", Uuid::new_v4(), ext)
            }
            Some(ext) => {
                return Err(MediaError::Upload(format!("Unsupported image type: .{ext}")));
            }
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;
        tokio::fs::write(self.root.join(&file_name), &image.bytes)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        tracing::info!(file = %file_name, bytes = image.len(), "Saved image to disk");
        Ok(format!("{UPLOADS_URL_PREFIX}{file_name}"))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), MediaError> {
        let Some(path) = self.file_for_url(url) else {
            tracing::debug!(image_url = %url, "Not a local upload, nothing to delete");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(file = %path.display(), "Deleted image from disk");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Delete(e.to_string())),
        }
    }
}
