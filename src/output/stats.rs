//! Statistics derived from a finished crawl
//!
//! This module provides functionality for summarizing and displaying
//! a `CrawlReport` together with the archive built from it.

use crate::archive::ArchiveSummary;
use crate::crawler::{BudgetLimit, CrawlReport, Termination};
use crate::output::format_size;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Distinct URLs processed
    pub urls_processed: usize,

    /// Pages written
    pub pages: u32,

    /// Resources written
    pub resources: u32,

    /// Bytes written
    pub total_bytes: u64,

    /// URLs that produced no artifact
    pub failed: usize,

    /// Frontier entries left when the crawl stopped
    pub unvisited: usize,

    /// Human-readable termination reason
    pub stop_reason: String,

    /// Crawl duration in seconds
    pub duration_seconds: f64,
}

impl CrawlStatistics {
    /// Builds statistics from a crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let stop_reason = match report.termination {
            Termination::Exhausted => "all reachable URLs visited".to_string(),
            Termination::BudgetCapped(BudgetLimit::Pages) => "page limit reached".to_string(),
            Termination::BudgetCapped(BudgetLimit::Bytes) => "size limit reached".to_string(),
        };

        Self {
            urls_processed: report.urls_processed,
            pages: report.pages_downloaded,
            resources: report.resources_downloaded,
            total_bytes: report.total_bytes,
            failed: report.outcomes.failures(),
            unvisited: report.frontier_remaining,
            stop_reason,
            duration_seconds: report.duration().num_milliseconds() as f64 / 1000.0,
        }
    }

    /// Share of processed URLs that produced an artifact, in percent
    pub fn success_rate(&self) -> f64 {
        if self.urls_processed == 0 {
            return 0.0;
        }
        let stored = self.pages as f64 + self.resources as f64;
        stored / self.urls_processed as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `archive` - The archive built from the crawl, if any
pub fn print_statistics(stats: &CrawlStatistics, archive: Option<&ArchiveSummary>) {
    println!("=== Snapshot Statistics ===\n");

    println!("Overview:");
    println!("  URLs processed: {}", stats.urls_processed);
    println!("  Pages downloaded: {}", stats.pages);
    println!("  Resources downloaded: {}", stats.resources);
    println!("  Downloaded size: {}", format_size(stats.total_bytes));
    println!("  Failed URLs: {}", stats.failed);
    println!("  Stopped: {}", stats.stop_reason);
    if stats.unvisited > 0 {
        println!("  Left in queue: {}", stats.unvisited);
    }
    println!("  Duration: {:.1}s", stats.duration_seconds);
    println!();

    if let Some(archive) = archive {
        println!("Archive:");
        println!("  Path: {}", archive.path.display());
        println!("  Files: {}", archive.files);
        if archive.skipped > 0 {
            println!("  Skipped (too large): {}", archive.skipped);
        }
        println!("  Size: {}", format_size(archive.archive_bytes));
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs stored)",
        stats.success_rate(),
        stats.pages + stats.resources,
        stats.urls_processed
    );
}
