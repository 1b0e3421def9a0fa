//! Storage module for persisting captured content
//!
//! This module handles everything that touches the destination directory:
//! - Mapping remote URLs onto a local file layout
//! - Atomic, size-capped writes of fetched bodies
//! - The `ArtifactStore` seam used by the crawl loop

mod filesystem;
mod layout;
mod traits;

pub use filesystem::DirectoryStore;
pub use layout::{map_url_to_path, DEFAULT_DOCUMENT, MAX_PATH_DEPTH, MAX_SEGMENT_LEN};
pub use traits::{ArtifactStore, StorageError, StorageResult};

use std::path::PathBuf;

/// The on-disk file produced for one URL
///
/// Created once by the persistence step and never rewritten by the crawler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    /// The URL the content was fetched from
    pub url: String,

    /// Where the content was written
    pub path: PathBuf,

    /// Number of bytes written
    pub size: u64,
}
