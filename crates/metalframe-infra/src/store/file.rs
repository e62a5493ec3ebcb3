//! File-backed local store - one `<slot>.json` file per slot in a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use metalframe_core::ports::{LocalStore, StoreError};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        let name: String = slot
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl LocalStore for FileStore {
    async fn read(&self, slot: &str) -> Option<String> {
        match tokio::fs::read_to_string(self.slot_path(slot)).await {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(slot, error = %e, "Failed to read local slot");
                None
            }
        }
    }

    async fn write(&self, slot: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        tracing::debug!(slot, bytes = value.len(), "Wrote local slot");
        Ok(())
    }
}
