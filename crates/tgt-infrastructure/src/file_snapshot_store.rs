//! File-backed session snapshot store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tgt_core::session::SnapshotStore;
use tgt_core::{Result, TgtError};
use tokio::sync::Mutex;

use crate::paths::{ServiceType, TgtPaths};
use crate::storage::write_atomic;

/// Keeps the last-known session in a single JSON file.
#[derive(Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
    /// Serializes file access across clones.
    lock: Arc<Mutex<()>>,
}

impl FileSnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Store at the default snapshot location.
    pub fn from_paths(paths: &TgtPaths) -> Result<Self> {
        Ok(Self::new(paths.get_path(ServiceType::Snapshot)?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        let _guard = self.lock.lock().await;
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| TgtError::internal(format!("Failed to join task: {}", e)))??;

        tracing::debug!("[FileSnapshotStore] Saved snapshot to {:?}", self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("[FileSnapshotStore] Removed snapshot {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("session.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("data/session.json"));

        store.save(br#"{"uid":"U1"}"#).await.unwrap();
        assert_eq!(
            store.load().await.unwrap().as_deref(),
            Some(&br#"{"uid":"U1"}"#[..])
        );

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_clear_when_empty_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("session.json"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
