//! Blob store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("blob already exists: {bucket}/{path}")]
    AlreadyExists { bucket: String, path: String },

    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlobError {
    pub fn not_found(bucket: &str, path: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            path: path.to_string(),
        }
    }

    pub fn already_exists(bucket: &str, path: &str) -> Self {
        Self::AlreadyExists {
            bucket: bucket.to_string(),
            path: path.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for blob store operations
pub type Result<T> = std::result::Result<T, BlobError>;
