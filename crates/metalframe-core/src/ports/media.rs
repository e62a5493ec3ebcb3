//! Media store port - where uploaded images live.

use async_trait::async_trait;

use crate::domain::ImageUpload;

/// Media store trait - abstraction over image hosting (cloud, local disk).
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the image and return its durable URL.
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError>;

    /// Remove the image behind `url`.
    ///
    /// Callers treat this as best-effort. URLs this store did not produce
    /// are ignored and return `Ok`.
    async fn delete_by_url(&self, url: &str) -> Result<(), MediaError>;
}

/// Media store errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Image too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
}
