//! History log error types.

use carelog_traits::BlobError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid subject id: {0:?}")]
    InvalidSubject(String),

    #[error("history storage error: {0}")]
    Storage(#[from] BlobError),
}

/// Result type alias for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;
