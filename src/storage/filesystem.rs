use crate::storage::{map_url_to_path, ArtifactStore, LocalArtifact, StorageError, StorageResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use url::Url;

/// Artifact store backed by a directory tree
///
/// Each body is written to a temporary file in its target directory and then
/// renamed into place, so the mapped path either holds a complete body or is
/// untouched.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    max_file_bytes: u64,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`, creating the directory if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Destination directory for this crawl
    /// * `max_file_bytes` - Per-file cap
    pub fn create(root: &Path, max_file_bytes: u64) -> StorageResult<Self> {
        fs::create_dir_all(root)?;

        Ok(Self {
            root: root.to_path_buf(),
            max_file_bytes,
        })
    }
}

impl ArtifactStore for DirectoryStore {
    fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    fn persist(&mut self, url: &Url, body: &[u8]) -> StorageResult<LocalArtifact> {
        let size = body.len() as u64;
        if size > self.max_file_bytes {
            return Err(StorageError::TooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }

        let path = map_url_to_path(url, &self.root)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(body)?;
        staged.flush()?;
        staged.persist(&path).map_err(|e| StorageError::Io(e.error))?;

        tracing::trace!("Committed {} ({} bytes)", path.display(), size);

        Ok(LocalArtifact {
            url: url.to_string(),
            path,
            size,
        })
    }
}
