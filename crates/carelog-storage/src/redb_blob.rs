//! Blob storage on top of an embedded redb database.
//!
//! All blobs share one table keyed by `{bucket}/{path}`. redb transactions
//! are synchronous, so every call hops onto the blocking pool.

use crate::keys::{blob_key, validate_blob_path, validate_bucket};
use crate::{SimpleStorage, define_simple_storage};
use async_trait::async_trait;
use carelog_traits::{BlobError, BlobResult, BlobStore, UploadOptions};
use redb::Database;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

define_simple_storage! {
    /// Blob store with byte-level API backed by the `blobs` table.
    pub struct RedbBlobStore { table: "blobs" }
}

impl RedbBlobStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let db = Arc::new(Database::create(path.as_ref())?);
        Self::new(db)
    }
}

async fn run_blocking<T, F>(task: F) -> BlobResult<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| BlobError::Backend(format!("storage task failed: {e}")))?
        .map_err(|e| BlobError::Backend(format!("{e:#}")))
}

#[async_trait]
impl BlobStore for RedbBlobStore {
    async fn download(&self, bucket: &str, path: &str) -> BlobResult<Vec<u8>> {
        validate_blob_path(bucket, path)?;
        let key = blob_key(bucket, path);
        let store = self.clone();

        run_blocking(move || store.get_raw(&key))
            .await?
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
        let key = blob_key(bucket, path);
        let data = content.to_vec();
        let store = self.clone();
        let size = data.len();

        if options.upsert {
            run_blocking(move || store.put_raw(&key, &data)).await?;
        } else {
            let inserted = run_blocking(move || store.insert_new_raw(&key, &data)).await?;
            if !inserted {
                return Err(BlobError::already_exists(bucket, path));
            }
        }

        debug!(bucket, path, size, "Stored blob in redb");
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> BlobResult<bool> {
        validate_blob_path(bucket, path)?;
        let key = blob_key(bucket, path);
        let store = self.clone();

        run_blocking(move || store.delete(&key)).await
    }

    async fn list(&self, bucket: &str, prefix: &str) -> BlobResult<Vec<String>> {
        validate_bucket(bucket)?;
        let bucket_prefix = format!("{bucket}/");
        let key_prefix = format!("{bucket_prefix}{prefix}");
        let store = self.clone();

        let keys = run_blocking(move || store.keys_with_prefix(&key_prefix)).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(&bucket_prefix).map(str::to_string))
            .collect())
    }
}
