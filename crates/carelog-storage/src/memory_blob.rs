//! In-memory blob store.

use crate::keys::{blob_key, validate_blob_path, validate_bucket};
use async_trait::async_trait;
use carelog_traits::{BlobError, BlobResult, BlobStore, UploadOptions};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

/// Process-local blob store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs across all buckets.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn download(&self, bucket: &str, path: &str) -> BlobResult<Vec<u8>> {
        validate_blob_path(bucket, path)?;
        self.blobs
            .read()
            .get(&blob_key(bucket, path))
            .cloned()
            .ok_or_else(|| BlobError::not_found(bucket, path))
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: &[u8],
        options: UploadOptions,
    ) -> BlobResult<()> {
        validate_blob_path(bucket, path)?;
        let mut blobs = self.blobs.write();
        match blobs.entry(blob_key(bucket, path)) {
            Entry::Occupied(mut slot) => {
                if !options.upsert {
                    return Err(BlobError::already_exists(bucket, path));
                }
                slot.insert(content.to_vec());
            }
            Entry::Vacant(slot) => {
                slot.insert(content.to_vec());
            }
        }
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> BlobResult<bool> {
        validate_blob_path(bucket, path)?;
        Ok(self.blobs.write().remove(&blob_key(bucket, path)).is_some())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> BlobResult<Vec<String>> {
        validate_bucket(bucket)?;
        let bucket_prefix = format!("{bucket}/");
        let key_prefix = format!("{bucket_prefix}{prefix}");
        Ok(self
            .blobs
            .read()
            .range(key_prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&key_prefix))
            .filter_map(|(key, _)| key.strip_prefix(&bucket_prefix).map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_contents() {
        let store = MemoryBlobStore::new();
        let clone = store.clone();

        store
            .upload("documents", "a.txt", b"x", UploadOptions::upsert())
            .await
            .unwrap();
        assert_eq!(clone.download("documents", "a.txt").await.unwrap(), b"x");
        assert_eq!(clone.len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_without_upsert() {
        let store = MemoryBlobStore::new();
        store
            .upload("documents", "a.txt", b"x", UploadOptions::default())
            .await
            .unwrap();
        let err = store
            .upload("documents", "a.txt", b"y", UploadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_and_remove() {
        let store = MemoryBlobStore::new();
        for path in ["ai-history/b.txt", "ai-history/a.txt", "other/c.txt"] {
            store
                .upload("documents", path, b"x", UploadOptions::upsert())
                .await
                .unwrap();
        }

        assert_eq!(
            store.list("documents", "ai-history/").await.unwrap(),
            vec!["ai-history/a.txt", "ai-history/b.txt"]
        );
        assert!(store.remove("documents", "other/c.txt").await.unwrap());
        assert!(!store.remove("documents", "other/c.txt").await.unwrap());
        assert!(store.download("documents", "other/c.txt").await.unwrap_err().is_not_found());
    }
}
