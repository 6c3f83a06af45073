//! Carelog Storage - blob store backends
//!
//! This crate provides the persistence layer behind the `BlobStore` contract
//! from carelog-traits. Every backend addresses blobs by bucket and path, so
//! a transcript at `documents/ai-history/p-1.txt` lives at the same address
//! whichever backend is selected.
//!
//! # Backends
//!
//! - `RedbBlobStore` - single `blobs` table in an embedded redb database
//! - `FsBlobStore` - one file per blob under a root directory
//! - `MemoryBlobStore` - process-local map, used by tests and embedders

pub mod fs_blob;
pub mod keys;
pub mod memory_blob;
pub mod paths;
pub mod redb_blob;
pub mod simple_storage;

pub use fs_blob::FsBlobStore;
pub use keys::{blob_key, validate_blob_path, validate_bucket};
pub use memory_blob::MemoryBlobStore;
pub use redb_blob::RedbBlobStore;
pub use simple_storage::SimpleStorage;
