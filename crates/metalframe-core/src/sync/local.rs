use std::sync::Arc;

use crate::domain::Post;
use crate::ports::{LocalStore, StoreError};

/// Slot holding the full serialized post list.
pub const LOCAL_POSTS_SLOT: &str = "mfs_posts";

/// The client-side post list kept in a [`LocalStore`] slot.
#[derive(Clone)]
pub struct LocalPostCache {
    store: Arc<dyn LocalStore>,
}

impl LocalPostCache {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Read the cached posts. A missing or corrupt slot reads as empty.
    pub async fn load(&self) -> Vec<Post> {
        let Some(raw) = self.store.read(LOCAL_POSTS_SLOT).await else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(error = %e, "Local post cache is corrupt, ignoring it");
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with `posts`.
    pub async fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        let raw =
            serde_json::to_string(posts).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.write(LOCAL_POSTS_SLOT, &raw).await
    }
}
