//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal loop that coordinates:
//! - Pulling candidates off the frontier in FIFO order
//! - Fetching, classifying and persisting each URL
//! - Extracting links from HTML pages and queueing in-scope ones
//! - Stopping on an empty frontier or an exhausted budget

use crate::config::Config;
use crate::crawler::frontier::{BudgetLimit, CrawlBudget, CrawlLimits, CrawlState};
use crate::crawler::parser::parse_html;
use crate::crawler::report::{CrawlReport, OutcomeCounts, Termination, UrlOutcome};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::storage::{ArtifactStore, DirectoryStore, StorageError};
use crate::url::{classify_url, ContentKind, SeedTarget};
use crate::SnapshotError;
use chrono::Utc;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Drives crawls
///
/// Holds only immutable settings and the HTTP client, so one coordinator can
/// serve any number of crawls, concurrently or not. Each call to `run` builds
/// its own `CrawlState`.
#[derive(Debug, Clone)]
pub struct Coordinator {
    client: Client,
    limits: CrawlLimits,
}

impl Coordinator {
    /// Creates a coordinator using the limits from `config.crawler`
    pub fn new(config: &Config) -> Result<Self, SnapshotError> {
        Self::with_limits(config, CrawlLimits::from(&config.crawler))
    }

    /// Creates a coordinator with explicit limits
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(SnapshotError::InvalidLimits)` - A limit is zero
    /// * `Err(SnapshotError::HttpClient)` - The HTTP client could not be built
    pub fn with_limits(config: &Config, limits: CrawlLimits) -> Result<Self, SnapshotError> {
        limits.validate()?;
        let client = build_http_client(&config.crawler, &config.user_agent)?;

        Ok(Self { client, limits })
    }

    /// The limits applied to every crawl
    pub fn limits(&self) -> &CrawlLimits {
        &self.limits
    }

    /// Crawls `seed` into `dest_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - At least one artifact was written
    /// * `Err(SnapshotError::EmptyResult)` - Nothing could be written
    /// * `Err(SnapshotError::Storage)` - `dest_dir` could not be created
    pub async fn run(
        &self,
        seed: &SeedTarget,
        dest_dir: &Path,
    ) -> Result<CrawlReport, SnapshotError> {
        let mut store = DirectoryStore::create(dest_dir, self.limits.max_file_bytes)?;
        let report = self.run_with_store(seed, &mut store).await;

        if report.is_empty() {
            return Err(SnapshotError::EmptyResult {
                url: seed.url.to_string(),
            });
        }

        Ok(report)
    }

    /// Runs the traversal loop against any artifact store
    ///
    /// Per-URL failures are absorbed here and show up only in the report's
    /// counters, so this never fails.
    pub async fn run_with_store<S: ArtifactStore>(
        &self,
        seed: &SeedTarget,
        store: &mut S,
    ) -> CrawlReport {
        let started_at = Utc::now();
        let mut state = CrawlState::new(seed.url.clone(), &self.limits);
        let mut outcomes = OutcomeCounts::default();
        let mut artifacts = Vec::new();

        tracing::info!(
            "Starting crawl of {} (domain {}, {} pages / {} bytes max)",
            seed.url,
            seed.base_domain,
            self.limits.max_pages,
            self.limits.max_total_bytes
        );

        let termination = loop {
            if !state.has_pending() {
                tracing::info!("Frontier is empty, crawl complete");
                break Termination::Exhausted;
            }

            if let Some(limit) = state.budget.exhausted() {
                tracing::info!("Budget reached ({:?}), stopping crawl", limit);
                break Termination::BudgetCapped(limit);
            }

            let Some(url) = state.next_unseen() else {
                break Termination::Exhausted;
            };

            let kind = classify_url(&url);
            let (outcome, links) = self
                .process_url(&url, kind, seed, store, &state.budget)
                .await;
            outcomes.record(&outcome);

            let mut queued = 0;
            for link in links {
                if seed.contains(&link) && state.enqueue(link) {
                    queued += 1;
                }
            }
            if queued > 0 {
                tracing::debug!("Queued {} links from {}", queued, url);
            }

            match outcome {
                UrlOutcome::Persisted(artifact) => {
                    state.budget.record(kind, artifact.size);
                    match kind {
                        ContentKind::Page => tracing::info!(
                            "Downloaded page {}: {} ({} bytes)",
                            state.budget.pages_downloaded,
                            url,
                            artifact.size
                        ),
                        ContentKind::Resource => tracing::info!(
                            "Downloaded resource: {} ({} bytes)",
                            url,
                            artifact.size
                        ),
                    }
                    artifacts.push(artifact);
                }
                UrlOutcome::ScopeRejected => {
                    tracing::debug!("Dropped {}: response left the crawl domain", url);
                }
                UrlOutcome::FetchFailed { reason } => {
                    tracing::warn!("Error downloading {}: {}", url, reason);
                }
                UrlOutcome::OversizeRejected { limit } => {
                    tracing::warn!("File too large: {} (limit {} bytes)", url, limit);
                }
                UrlOutcome::PathRejected { reason } => {
                    tracing::warn!("Could not store {}: {}", url, reason);
                }
                UrlOutcome::OverBudget { size } => {
                    tracing::info!(
                        "{} ({} bytes) would exceed the byte budget, stopping crawl",
                        url,
                        size
                    );
                    break Termination::BudgetCapped(BudgetLimit::Bytes);
                }
            }
        };

        let urls_processed = state.seen_count();
        let frontier_remaining = state.frontier_len();
        let budget = state.budget.clone();

        let report = CrawlReport {
            seed: seed.url.to_string(),
            total_bytes: budget.total_bytes,
            urls_processed,
            pages_downloaded: budget.pages_downloaded,
            resources_downloaded: budget.resources_downloaded,
            outcomes,
            termination,
            artifacts,
            visited: state.into_visited(),
            frontier_remaining,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished: {} URLs processed, {} pages, {} resources, {} bytes",
            report.urls_processed,
            report.pages_downloaded,
            report.resources_downloaded,
            report.total_bytes
        );

        report
    }

    /// Fetches and persists one URL
    ///
    /// Returns the outcome together with the links found in the body. Links
    /// are only extracted from pages whose response declares an HTML content
    /// type, and are returned even when the page itself could not be stored.
    async fn process_url<S: ArtifactStore>(
        &self,
        url: &Url,
        kind: ContentKind,
        seed: &SeedTarget,
        store: &mut S,
        budget: &CrawlBudget,
    ) -> (UrlOutcome, Vec<Url>) {
        let (final_url, content_type, body) =
            match fetch_url(&self.client, url, store.max_file_bytes()).await {
                FetchResult::Success {
                    final_url,
                    content_type,
                    body,
                    ..
                } => (final_url, content_type, body),
                FetchResult::TooLarge { limit, .. } => {
                    return (UrlOutcome::OversizeRejected { limit }, Vec::new())
                }
                FetchResult::HttpError { status_code } => {
                    let reason = format!("HTTP {}", status_code);
                    return (UrlOutcome::FetchFailed { reason }, Vec::new());
                }
                FetchResult::NetworkError { error, .. } => {
                    return (UrlOutcome::FetchFailed { reason: error }, Vec::new())
                }
            };

        if !seed.contains(&final_url) {
            return (UrlOutcome::ScopeRejected, Vec::new());
        }

        let links = if kind == ContentKind::Page && is_html(&content_type) {
            let parsed = parse_html(&body, &final_url);
            if let Some(title) = &parsed.title {
                tracing::debug!("Parsed \"{}\" ({} links)", title, parsed.links.len());
            }
            parsed.links
        } else {
            Vec::new()
        };

        let size = body.len() as u64;
        if !budget.can_admit(size) {
            return (UrlOutcome::OverBudget { size }, links);
        }

        let outcome = match store.persist(url, &body) {
            Ok(artifact) => UrlOutcome::Persisted(artifact),
            Err(StorageError::TooLarge { limit, .. }) => UrlOutcome::OversizeRejected { limit },
            Err(e) => UrlOutcome::PathRejected {
                reason: e.to_string(),
            },
        };

        (outcome, links)
    }
}

/// Returns true if a Content-Type header value denotes HTML
fn is_html(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("text/html")
}

/// Runs a complete crawl with default settings and the given limits
///
/// # Arguments
///
/// * `seed_url` - Absolute http/https URL to start from
/// * `dest_dir` - Directory to write artifacts under (created if missing)
/// * `limits` - Page, byte and per-file ceilings; all must be positive
///
/// # Returns
///
/// * `Ok(CrawlReport)` - `total_bytes` and `urls_processed` plus details
/// * `Err(SnapshotError::InvalidSeed)` - The seed is not an absolute http(s) URL
/// * `Err(SnapshotError::InvalidLimits)` - A limit is zero
/// * `Err(SnapshotError::EmptyResult)` - Nothing could be downloaded
///
/// # Example
///
/// ```no_run
/// use site_snapshot::crawler::{crawl, CrawlLimits};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl("https://example.com/", Path::new("site_download"), CrawlLimits::default()).await?;
/// println!("{} bytes from {} URLs", report.total_bytes, report.urls_processed);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    seed_url: &str,
    dest_dir: &Path,
    limits: CrawlLimits,
) -> Result<CrawlReport, SnapshotError> {
    let seed = SeedTarget::parse(seed_url)?;
    let coordinator = Coordinator::with_limits(&Config::default(), limits)?;
    coordinator.run(&seed, dest_dir).await
}
