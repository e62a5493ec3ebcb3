//! In-memory local store - used in tests and for throwaway sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use metalframe_core::ports::{LocalStore, StoreError};

/// Slots in a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    slots: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    async fn read(&self, slot: &str) -> Option<String> {
        self.slots.read().await.get(slot).cloned()
    }

    async fn write(&self, slot: &str, value: &str) -> Result<(), StoreError> {
        self.slots
            .write()
            .await
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let store = InMemoryStore::new();
        assert_eq!(store.read("mfs_posts").await, None);

        store.write("mfs_posts", "[]").await.unwrap();
        assert_eq!(store.read("mfs_posts").await.as_deref(), Some("[]"));

        store.write("mfs_posts", r#"[{"id":"1"}]"#).await.unwrap();
        assert_eq!(store.read("mfs_posts").await.as_deref(), Some(r#"[{"id":"1"}]"#));
    }
}
