//! Delivery of finished archives
//!
//! The transport is pluggable: a chat bot, an upload, or a plain copy into a
//! local directory all implement `Delivery`.

use crate::service::RequesterId;
use crate::SnapshotError;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a transport needs to hand an archive over
#[derive(Debug, Clone)]
pub struct DeliveryPackage<'a> {
    pub requester: RequesterId,
    pub seed_url: &'a str,
    pub archive_path: &'a Path,
    /// Suggested file name on the receiving side
    pub file_name: String,
    /// Short human-readable description of the snapshot
    pub caption: String,
}

/// Transport for finished archives
pub trait Delivery: Send + Sync {
    /// Hands the archive over
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Where the archive went, for logging and user messages
    /// * `Err(SnapshotError)` - The transfer failed
    fn deliver(&self, package: &DeliveryPackage<'_>) -> Result<String, SnapshotError>;
}

/// Delivers by copying the archive into an outbox directory
#[derive(Debug, Clone)]
pub struct LocalDelivery {
    outbox: PathBuf,
}

impl LocalDelivery {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: outbox.into(),
        }
    }
}

impl Delivery for LocalDelivery {
    fn deliver(&self, package: &DeliveryPackage<'_>) -> Result<String, SnapshotError> {
        fs::create_dir_all(&self.outbox)?;
        let target = self.outbox.join(&package.file_name);

        fs::copy(package.archive_path, &target).map_err(|e| {
            SnapshotError::Delivery(format!("copy to {} failed: {}", target.display(), e))
        })?;
        tracing::info!(
            "Requester {}: {} ({})",
            package.requester,
            package.caption,
            package.seed_url
        );

        Ok(target.display().to_string())
    }
}

/// File name offered to the requester, e.g. `website_backup_example.com.zip`
///
/// A non-default port is kept, joined with `_` so the name stays portable.
pub fn backup_file_name(seed: &url::Url) -> String {
    let host = seed.host_str().unwrap_or("site");
    match seed.port() {
        Some(port) => format!("website_backup_{}_{}.zip", host, port),
        None => format!("website_backup_{}.zip", host),
    }
}
