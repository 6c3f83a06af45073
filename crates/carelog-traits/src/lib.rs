//! Carelog Traits - Shared storage contract.
//!
//! This crate provides the interfaces shared across the Carelog workspace:
//! - BlobStore, the bucket/path addressed blob store the history log writes to
//! - BlobError and the BlobResult alias
//! - UploadOptions

pub mod blob;
pub mod error;

pub use blob::{BlobStore, UploadOptions};
pub use error::{BlobError, Result as BlobResult};
