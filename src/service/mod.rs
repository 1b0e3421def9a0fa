//! Snapshot jobs for interactive front ends
//!
//! A job takes one requester's URL through crawl, archive and delivery:
//! - The registry keeps one job per requester and exposes its stage
//! - Each job works in its own directory under the configured work dir
//! - Finished archives go out through a `Delivery` transport
//! - Job files are deleted after a grace period, or at once on failure

pub mod cleanup;
pub mod delivery;
pub mod registry;

pub use cleanup::{remove_paths, schedule_cleanup};
pub use delivery::{backup_file_name, Delivery, DeliveryPackage, LocalDelivery};
pub use registry::{JobGuard, JobRegistry, JobStatus, RequesterId};

use crate::archive::{zip_directory, ArchiveSummary};
use crate::config::Config;
use crate::crawler::{Coordinator, CrawlReport};
use crate::output::format_size;
use crate::url::SeedTarget;
use crate::SnapshotError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Files belonging to one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    /// `<work-dir>/job-<requester>-<timestamp>`
    pub root: PathBuf,

    /// Where artifacts are written
    pub download_dir: PathBuf,

    /// Where the zip archive is built
    pub archive_path: PathBuf,
}

impl JobPaths {
    /// Lays out a fresh job directory for `requester`
    pub fn new(work_dir: &Path, archive_name: &str, requester: RequesterId) -> Self {
        let stamp = Utc::now().format("%Y%m%d%H%M%S%3f");
        let root = work_dir.join(format!("job-{}-{}", requester, stamp));

        Self {
            download_dir: root.join("site"),
            archive_path: root.join(archive_name),
            root,
        }
    }

    /// Paths to delete, contents before their parent
    pub fn cleanup_list(&self) -> Vec<PathBuf> {
        vec![
            self.archive_path.clone(),
            self.download_dir.clone(),
            self.root.clone(),
        ]
    }
}

/// Result of a delivered job
#[derive(Debug)]
pub struct JobReceipt {
    pub report: CrawlReport,
    pub archive: ArchiveSummary,
    pub paths: JobPaths,

    /// Where the delivery transport put the archive
    pub delivered_to: String,

    /// Summary sent along with the archive
    pub caption: String,

    /// Pending removal of the job's files
    pub cleanup: JoinHandle<()>,
}

/// Runs snapshot jobs and tracks them per requester
pub struct SnapshotService<D: Delivery> {
    config: Config,
    coordinator: Coordinator,
    registry: JobRegistry,
    delivery: D,
}

impl<D: Delivery> SnapshotService<D> {
    /// Creates a service from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SnapshotService)` - Ready to accept jobs
    /// * `Err(SnapshotError)` - The limits are invalid or the HTTP client failed
    pub fn new(config: Config, delivery: D) -> Result<Self, SnapshotError> {
        let coordinator = Coordinator::new(&config)?;

        Ok(Self {
            config,
            coordinator,
            registry: JobRegistry::new(),
            delivery,
        })
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Stage of `requester`'s running job, if any
    pub fn status(&self, requester: RequesterId) -> Option<JobStatus> {
        self.registry.status(requester)
    }

    fn grace_period(&self) -> Duration {
        Duration::from_secs(self.config.cleanup.grace_period_secs)
    }

    /// Takes `url` through crawl, archive and delivery for `requester`
    ///
    /// The requester's status is cleared when this returns, whatever the
    /// outcome. On failure the job's files are removed immediately; on
    /// success they are removed after the cleanup grace period.
    ///
    /// # Arguments
    ///
    /// * `requester` - Who asked; at most one job per requester runs at a time
    /// * `url` - The seed URL as the requester typed it
    ///
    /// # Returns
    ///
    /// * `Ok(JobReceipt)` - The archive was delivered
    /// * `Err(SnapshotError::InvalidSeed)` - The URL was rejected before any work
    /// * `Err(SnapshotError::JobInProgress)` - The requester already has a job
    /// * `Err(SnapshotError::EmptyResult)` - Nothing could be downloaded
    /// * `Err(SnapshotError)` - Archiving or delivery failed
    pub async fn submit(
        &self,
        requester: RequesterId,
        url: &str,
    ) -> Result<JobReceipt, SnapshotError> {
        let seed = SeedTarget::parse(url)?;
        let guard = self.registry.begin(requester)?;

        let paths = JobPaths::new(
            Path::new(&self.config.output.work_dir),
            &self.config.output.archive_name,
            requester,
        );
        tracing::info!(
            "Requester {} started a snapshot of {} in {}",
            requester,
            seed.url,
            paths.root.display()
        );

        match self.execute(&guard, &seed, &paths).await {
            Ok((report, archive, delivered_to)) => {
                let cleanup = schedule_cleanup(paths.cleanup_list(), self.grace_period());
                Ok(JobReceipt {
                    caption: caption(&report, &archive),
                    report,
                    archive,
                    paths,
                    delivered_to,
                    cleanup,
                })
            }
            Err(e) => {
                tracing::warn!(
                    "Snapshot of {} for requester {} failed: {}",
                    seed.url,
                    requester,
                    e
                );
                remove_paths(&paths.cleanup_list());
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        guard: &JobGuard,
        seed: &SeedTarget,
        paths: &JobPaths,
    ) -> Result<(CrawlReport, ArchiveSummary, String), SnapshotError> {
        let report = self.coordinator.run(seed, &paths.download_dir).await?;

        guard.set(JobStatus::Archiving);
        let archive = zip_directory(
            &paths.download_dir,
            &paths.archive_path,
            self.coordinator.limits().max_file_bytes,
        )?;

        guard.set(JobStatus::Delivering);
        let package = DeliveryPackage {
            requester: guard.requester(),
            seed_url: seed.url.as_str(),
            archive_path: &archive.path,
            file_name: backup_file_name(&seed.url),
            caption: caption(&report, &archive),
        };
        let delivered_to = self.delivery.deliver(&package)?;
        tracing::info!("Delivered {} to {}", package.file_name, delivered_to);

        Ok((report, archive, delivered_to))
    }
}

/// One-line summary shown alongside the delivered archive
pub fn caption(report: &CrawlReport, archive: &ArchiveSummary) -> String {
    let mut text = format!(
        "Download completed! Downloaded {} files. File size: {}.",
        report.artifacts.len(),
        format_size(archive.archive_bytes)
    );
    if report.is_budget_capped() {
        text.push_str(" The site was larger than the download limits; this snapshot is partial.");
    }
    text
}
