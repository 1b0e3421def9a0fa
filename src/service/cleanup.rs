//! Deferred removal of job files
//!
//! Archives and download trees are kept for a grace period after delivery and
//! then deleted. Removal failures are logged and otherwise ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Deletes `paths` after `grace` has elapsed
///
/// Returns the handle of the spawned task; dropping it does not cancel the
/// cleanup.
pub fn schedule_cleanup(paths: Vec<PathBuf>, grace: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }
        remove_paths(&paths);
    })
}

/// Deletes each path now, files and directory trees alike
///
/// Missing paths are skipped silently.
pub fn remove_paths(paths: &[PathBuf]) {
    for path in paths {
        match remove_path(path) {
            Ok(true) => tracing::info!("Deleted {}", path.display()),
            Ok(false) => {}
            Err(e) => tracing::error!("Error cleaning up {}: {}", path.display(), e),
        }
    }
}

fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}
