//! Filesystem blob store.
//!
//! Layout: `{root}/{bucket}/{path}`. Upserts write a hidden temp file next to
//! the target and rename it into place, so readers never observe a partially
//! written blob.

use crate::keys::{validate_blob_path, validate_bucket};
use async_trait::async_trait;
use carelog_traits::{BlobError, BlobResult, BlobStore, UploadOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use walkdir::WalkDir;

const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, bucket: &str, path: &str) -> BlobResult<PathBuf> {
        validate_blob_path(bucket, path)?;
        let mut file = self.root.join(bucket);
        for segment in path.split('/') {
            file.push(segment);
        }
        Ok(file)
    }

    fn temp_path_for(file: &Path) -> PathBuf {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        file.with_file_name(format!(".{name}.{}.{n}{TEMP_SUFFIX}", std::process::id()))
    }
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn download(&self, bucket: &str, path: &str) -> BlobResult<Vec<u8>> {
        let file = self.blob_path(bucket, path)?;
        match tokio::fs::read(&file).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::not_found(bucket, path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: &[u8],
        options: UploadOptions,
    ) -> BlobResult<()> {
        let file = self.blob_path(bucket, path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if options.upsert {
            let temp = Self::temp_path_for(&file);
            tokio::fs::write(&temp, content).await?;
            if let Err(e) = tokio::fs::rename(&temp, &file).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(e.into());
            }
        } else {
            let mut handle = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file)
                .await
            {
                Ok(handle) => handle,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    return Err(BlobError::already_exists(bucket, path));
                }
                Err(e) => return Err(e.into()),
            };
            handle.write_all(content).await?;
            handle.flush().await?;
        }

        debug!(bucket, path, size = content.len(), "Stored blob on disk");
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> BlobResult<bool> {
        let file = self.blob_path(bucket, path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, bucket: &str, prefix: &str) -> BlobResult<Vec<String>> {
        validate_bucket(bucket)?;
        let bucket_dir = self.root.join(bucket);
        let prefix = prefix.to_string();

        tokio::task::spawn_blocking(move || -> BlobResult<Vec<String>> {
            if !bucket_dir.exists() {
                return Ok(Vec::new());
            }

            let mut paths = Vec::new();
            for entry in WalkDir::new(&bucket_dir) {
                let entry = entry.map_err(|e| BlobError::Backend(e.to_string()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if is_temp_file(&entry.file_name().to_string_lossy()) {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(&bucket_dir) else {
                    continue;
                };
                let path = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if path.starts_with(&prefix) {
                    paths.push(path);
                }
            }
            paths.sort();
            Ok(paths)
        })
        .await
        .map_err(|e| BlobError::Backend(format!("storage task failed: {e}")))?
    }
}
