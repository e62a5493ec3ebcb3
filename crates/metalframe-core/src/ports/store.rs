use async_trait::async_trait;

/// Local store trait - named durable slots holding serialized values.
///
/// This is the client-side fallback storage: it survives restarts but is
/// private to one client.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read a slot. Missing or unreadable slots read as `None`.
    async fn read(&self, slot: &str) -> Option<String>;

    /// Replace the slot's contents.
    async fn write(&self, slot: &str, value: &str) -> Result<(), StoreError>;
}

/// Local store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Write failed: {0}")]
    Io(String),
}
