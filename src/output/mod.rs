//! Output module for presenting crawl results
//!
//! This module handles:
//! - Human-readable byte sizes
//! - Printing crawl and archive statistics

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB"];

/// Formats a byte count with two decimals in the largest fitting unit
///
/// # Examples
///
/// ```
/// use site_snapshot::output::format_size;
///
/// assert_eq!(format_size(512), "512.00 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(50 * 1024 * 1024), "50.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;

    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }

    format!("{:.2} TB", size)
}
