//! Crawl outcome types
//!
//! `UrlOutcome` is the per-URL result the traversal loop matches on;
//! `CrawlReport` is what a finished crawl hands back to its caller.

use crate::crawler::frontier::BudgetLimit;
use crate::storage::LocalArtifact;
use chrono::{DateTime, Utc};

/// What happened to one dequeued URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// The body was written to disk
    Persisted(LocalArtifact),

    /// The response ended up outside the crawl's domain (off-site redirect)
    ScopeRejected,

    /// Network error, timeout, or non-success status
    FetchFailed { reason: String },

    /// The body passed the per-file cap; nothing was written
    OversizeRejected { limit: u64 },

    /// The URL has no safe local path, or the write failed
    PathRejected { reason: String },

    /// Writing the body would pass the total byte ceiling
    OverBudget { size: u64 },
}

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The frontier ran dry
    Exhausted,

    /// A page or byte ceiling was reached; the snapshot is partial but valid
    BudgetCapped(BudgetLimit),
}

/// Per-outcome counters for a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub persisted: usize,
    pub scope_rejected: usize,
    pub fetch_failed: usize,
    pub oversize_rejected: usize,
    pub path_rejected: usize,
    pub over_budget: usize,
}

impl OutcomeCounts {
    /// Bumps the counter matching `outcome`
    pub fn record(&mut self, outcome: &UrlOutcome) {
        match outcome {
            UrlOutcome::Persisted(_) => self.persisted += 1,
            UrlOutcome::ScopeRejected => self.scope_rejected += 1,
            UrlOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            UrlOutcome::OversizeRejected { .. } => self.oversize_rejected += 1,
            UrlOutcome::PathRejected { .. } => self.path_rejected += 1,
            UrlOutcome::OverBudget { .. } => self.over_budget += 1,
        }
    }

    /// Total number of URLs that produced no artifact
    pub fn failures(&self) -> usize {
        self.scope_rejected
            + self.fetch_failed
            + self.oversize_rejected
            + self.path_rejected
            + self.over_budget
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL
    pub seed: String,

    /// Sum of the sizes of all written artifacts
    pub total_bytes: u64,

    /// Number of distinct URLs dequeued (the size of the seen-set)
    pub urls_processed: usize,

    /// Pages written
    pub pages_downloaded: u32,

    /// Resources written
    pub resources_downloaded: u32,

    /// Per-outcome counters
    pub outcomes: OutcomeCounts,

    /// Why the crawl stopped
    pub termination: Termination,

    /// Every artifact written, in write order
    pub artifacts: Vec<LocalArtifact>,

    /// URLs in the order they were fetched
    pub visited: Vec<String>,

    /// Frontier entries discarded when the crawl stopped
    pub frontier_remaining: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Returns true if a budget ceiling ended the crawl
    pub fn is_budget_capped(&self) -> bool {
        matches!(self.termination, Termination::BudgetCapped(_))
    }

    /// Returns true if nothing at all was written
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
