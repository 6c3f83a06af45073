//! Carelog Core - rolling AI conversation transcripts per subject.
//!
//! `AppCore` wires the configured blob store backend to a
//! [`history::RollingHistoryLog`]. Callers hold the core explicitly; there is
//! no process-global state.

pub mod config;
pub mod history;

pub use carelog_storage::paths;
pub use config::{CarelogConfig, HistoryConfig, StorageBackend, StorageConfig};
pub use history::{AppendOutcome, HistoryError, ParsedEntry, RollingHistoryLog};

use anyhow::{Context, Result};
use carelog_storage::{FsBlobStore, MemoryBlobStore, RedbBlobStore};
use carelog_traits::BlobStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Application state shared by the CLI and embedders.
pub struct AppCore {
    pub config: CarelogConfig,
    pub store: Arc<dyn BlobStore>,
    pub history: RollingHistoryLog,
}

impl AppCore {
    /// Build the core with the backend selected in `config`, placing default
    /// storage files inside `data_dir`.
    pub fn new(config: CarelogConfig, data_dir: &Path) -> Result<Self> {
        config.validate()?;
        let store = open_store(&config, data_dir)?;
        info!(backend = %config.storage.backend, "Initializing Carelog");
        Ok(Self::with_store(config, store))
    }

    /// Build the core around an existing store.
    pub fn with_store(config: CarelogConfig, store: Arc<dyn BlobStore>) -> Self {
        let history = RollingHistoryLog::new(store.clone(), config.history.clone());
        Self {
            config,
            store,
            history,
        }
    }

    /// Delete a subject's transcript blob. Returns true if it existed.
    pub async fn clear_history(&self, subject: &str) -> Result<bool> {
        let path = self.history.storage_path(subject)?;
        let removed = self
            .store
            .remove(&self.config.history.bucket, &path)
            .await
            .with_context(|| format!("Failed to delete history for {subject}"))?;
        if removed {
            info!(subject, "Cleared AI history");
        }
        Ok(removed)
    }
}

fn open_store(config: &CarelogConfig, data_dir: &Path) -> Result<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.storage.backend {
        StorageBackend::Redb => {
            let db_path = match &config.storage.path {
                Some(path) => path.clone(),
                None => {
                    std::fs::create_dir_all(data_dir)?;
                    paths::database_path_in(data_dir)
                }
            };
            let store = RedbBlobStore::open(&db_path)
                .with_context(|| format!("Failed to open database {}", db_path.display()))?;
            Arc::new(store)
        }
        StorageBackend::Fs => {
            let root = config
                .storage
                .path
                .clone()
                .unwrap_or_else(|| paths::blob_root_in(data_dir));
            std::fs::create_dir_all(&root)
                .with_context(|| format!("Failed to create blob root {}", root.display()))?;
            Arc::new(FsBlobStore::new(root))
        }
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_redb_backend_in_data_dir() {
        let dir = tempdir().unwrap();
        let core = AppCore::new(CarelogConfig::default(), dir.path()).unwrap();

        core.history.append("p-1", "a", "b").await;
        assert!(dir.path().join("carelog.db").exists());
        assert!(core.history.load("p-1").await.contains("Assistente: b"));
    }

    #[tokio::test]
    async fn test_fs_backend_and_clear() {
        let dir = tempdir().unwrap();
        let mut config = CarelogConfig::default();
        config.storage.backend = StorageBackend::Fs;
        let core = AppCore::new(config, dir.path()).unwrap();

        core.history.append("p-1", "a", "b").await;
        assert!(dir.path().join("blobs/documents/ai-history/p-1.txt").exists());

        assert!(core.clear_history("p-1").await.unwrap());
        assert!(!core.clear_history("p-1").await.unwrap());
        assert_eq!(core.history.load("p-1").await, "");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempdir().unwrap();
        let mut config = CarelogConfig::default();
        config.history.max_length = 1;
        assert!(AppCore::new(config, dir.path()).is_err());
    }

    #[tokio::test]
    async fn test_clear_rejects_invalid_subject() {
        let core = AppCore::with_store(CarelogConfig::default(), Arc::new(MemoryBlobStore::new()));
        assert!(core.clear_history("a/b").await.is_err());
    }
}
