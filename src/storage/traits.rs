//! Storage traits and error types
//!
//! This module defines the trait interface for artifact stores and
//! associated error types.

use crate::storage::LocalArtifact;
use thiserror::Error;
use url::Url;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cannot map {url} to a local path: {reason}")]
    RejectedPath { url: String, reason: String },

    #[error("Content of {size} bytes exceeds the per-file limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for artifact store implementations
///
/// A store owns one destination root for the lifetime of a crawl. A write
/// either commits the whole body at its mapped location or leaves nothing
/// behind.
pub trait ArtifactStore {
    /// Largest body the store accepts
    fn max_file_bytes(&self) -> u64;

    /// Persists `body` as the artifact for `url`
    ///
    /// # Returns
    ///
    /// * `Ok(LocalArtifact)` - The committed file
    /// * `Err(StorageError::RejectedPath)` - The URL has no safe local mapping
    /// * `Err(StorageError::TooLarge)` - The body exceeds `max_file_bytes`
    /// * `Err(StorageError::Io)` - The write failed; no partial file remains
    fn persist(&mut self, url: &Url, body: &[u8]) -> StorageResult<LocalArtifact>;
}
