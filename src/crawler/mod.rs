//! Crawler module for fetching and capturing a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded body read
//! - HTML parsing and link extraction
//! - Frontier, seen-set and budget bookkeeping
//! - The traversal loop and its report

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod report;

pub use coordinator::{crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{BudgetLimit, CrawlBudget, CrawlLimits, CrawlState};
pub use parser::{parse_html, ParsedPage};
pub use report::{CrawlReport, OutcomeCounts, Termination, UrlOutcome};
