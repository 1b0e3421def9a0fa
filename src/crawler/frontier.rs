//! Per-crawl traversal state
//!
//! This module holds everything a single crawl mutates:
//! - The FIFO frontier of candidate URLs
//! - The seen-set enforcing single-visit semantics
//! - The page and byte budget counters
//!
//! A `CrawlState` is created by one crawl invocation and owned by it alone, so
//! concurrent crawls never share any of this.

use crate::config::CrawlerConfig;
use crate::url::ContentKind;
use crate::SnapshotError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Ceilings bounding a single crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Maximum number of pages persisted
    pub max_pages: u32,

    /// Maximum number of bytes persisted, all artifacts combined
    pub max_total_bytes: u64,

    /// Maximum size of one artifact
    pub max_file_bytes: u64,
}

impl CrawlLimits {
    /// Rejects zero limits
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.max_pages == 0 {
            return Err(SnapshotError::InvalidLimits(
                "page limit must be positive".to_string(),
            ));
        }
        if self.max_total_bytes == 0 {
            return Err(SnapshotError::InvalidLimits(
                "byte limit must be positive".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(SnapshotError::InvalidLimits(
                "per-file limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            max_total_bytes: config.max_total_bytes,
            max_file_bytes: config.max_file_bytes,
        }
    }
}

/// Which ceiling stopped a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLimit {
    Pages,
    Bytes,
}

/// Mutable page and byte counters checked before each fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlBudget {
    pub pages_downloaded: u32,
    pub resources_downloaded: u32,
    pub total_bytes: u64,
    page_limit: u32,
    byte_limit: u64,
}

impl CrawlBudget {
    pub fn new(limits: &CrawlLimits) -> Self {
        Self {
            pages_downloaded: 0,
            resources_downloaded: 0,
            total_bytes: 0,
            page_limit: limits.max_pages,
            byte_limit: limits.max_total_bytes,
        }
    }

    /// Returns the ceiling that has been reached, if any
    pub fn exhausted(&self) -> Option<BudgetLimit> {
        if self.pages_downloaded >= self.page_limit {
            Some(BudgetLimit::Pages)
        } else if self.total_bytes >= self.byte_limit {
            Some(BudgetLimit::Bytes)
        } else {
            None
        }
    }

    /// Bytes that can still be written without passing the byte ceiling
    pub fn remaining_bytes(&self) -> u64 {
        self.byte_limit.saturating_sub(self.total_bytes)
    }

    /// Returns true if an artifact of `size` bytes fits in the byte budget
    pub fn can_admit(&self, size: u64) -> bool {
        size <= self.remaining_bytes()
    }

    /// Records a persisted artifact
    pub fn record(&mut self, kind: ContentKind, size: u64) {
        self.total_bytes += size;
        match kind {
            ContentKind::Page => self.pages_downloaded += 1,
            ContentKind::Resource => self.resources_downloaded += 1,
        }
    }
}

/// Frontier, seen-set and budget for one crawl
#[derive(Debug)]
pub struct CrawlState {
    frontier: VecDeque<Url>,
    seen: HashSet<String>,
    visited: Vec<String>,
    pub budget: CrawlBudget,
}

impl CrawlState {
    /// Creates the state for a fresh crawl with `seed` as the only candidate
    pub fn new(seed: Url, limits: &CrawlLimits) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(seed);

        Self {
            frontier,
            seen: HashSet::new(),
            visited: Vec::new(),
            budget: CrawlBudget::new(limits),
        }
    }

    /// Dequeues the next URL not yet seen and marks it seen
    ///
    /// Already-seen entries are dropped without touching the budget.
    pub fn next_unseen(&mut self) -> Option<Url> {
        while let Some(url) = self.frontier.pop_front() {
            if self.seen.contains(url.as_str()) {
                tracing::trace!("Skipping already seen {}", url);
                continue;
            }

            self.seen.insert(url.as_str().to_string());
            self.visited.push(url.as_str().to_string());
            return Some(url);
        }
        None
    }

    /// Appends `url` to the frontier tail unless it has been seen
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.seen.contains(url.as_str()) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Returns true if an unseen URL is waiting
    ///
    /// Already-seen entries at the head of the frontier are dropped on the way.
    pub fn has_pending(&mut self) -> bool {
        while let Some(front) = self.frontier.front() {
            if !self.seen.contains(front.as_str()) {
                return true;
            }
            self.frontier.pop_front();
        }
        false
    }

    /// Number of distinct URLs dequeued so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of entries still waiting, duplicates included
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// URLs in the order they were dequeued
    pub fn into_visited(self) -> Vec<String> {
        self.visited
    }
}
