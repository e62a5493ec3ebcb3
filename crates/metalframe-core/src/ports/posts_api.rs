//! Posts API port - the client's view of the HTTP backend.

use async_trait::async_trait;

use crate::domain::{ImageUpload, LocalizedText, Post, PostId};

/// Body of a create or update call.
#[derive(Debug, Clone)]
pub struct PostPayload {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub image: Option<ImageUpload>,
}

/// Remote posts API: list, create, update, delete and bulk import.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, ApiError>;

    async fn create(&self, payload: PostPayload) -> Result<Post, ApiError>;

    async fn update(&self, id: &PostId, payload: PostPayload) -> Result<Post, ApiError>;

    async fn delete(&self, id: &PostId) -> Result<(), ApiError>;

    /// Send posts for bulk insertion; returns how many were imported.
    async fn import(&self, posts: Vec<Post>) -> Result<usize, ApiError>;
}

/// Posts API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure, or a response that could not be decoded.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status, with the backend's `{error}` text when present.
    #[error("Request rejected ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },
}
