//! Blob store abstraction.
//!
//! Blobs are addressed by a bucket name and a slash-separated path inside
//! the bucket. Implementations are provided by `carelog-storage`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options applied to a single upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Overwrite an existing blob instead of failing with `AlreadyExists`.
    #[serde(default)]
    pub upsert: bool,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl UploadOptions {
    /// Options for a last-write-wins overwrite.
    pub fn upsert() -> Self {
        Self {
            upsert: true,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the full content of a blob. A missing blob is `BlobError::NotFound`.
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>>;

    /// Store `content` at `path`, honoring `options.upsert`.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: &[u8],
        options: UploadOptions,
    ) -> Result<()>;

    /// Delete a blob, returns true if it existed.
    async fn remove(&self, bucket: &str, path: &str) -> Result<bool>;

    /// List blob paths in `bucket` starting with `prefix`, sorted ascending.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_options() {
        let options = UploadOptions::upsert().with_content_type("text/plain");
        assert!(options.upsert);
        assert_eq!(options.content_type.as_deref(), Some("text/plain"));

        let defaults = UploadOptions::default();
        assert!(!defaults.upsert);
        assert!(defaults.content_type.is_none());
    }

    #[test]
    fn test_not_found_helper() {
        let err = crate::BlobError::not_found("documents", "ai-history/p1.txt");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "blob not found: documents/ai-history/p1.txt");
        assert!(!crate::BlobError::Backend("boom".into()).is_not_found());
    }
}
