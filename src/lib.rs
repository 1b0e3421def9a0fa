//! Site-Snapshot: a bounded website capture engine
//!
//! This crate fetches a website breadth-first from a seed URL, stores a bounded
//! snapshot of its pages and same-domain resources on local storage, and packages
//! the result into a single zip archive.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Invalid crawl limits: {0}")]
    InvalidLimits(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing could be downloaded from {url}")]
    EmptyResult { url: String },

    #[error("Requester {requester} already has a download in progress")]
    JobInProgress { requester: u64 },

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Snapshot operations
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlLimits, CrawlReport, Termination};
pub use url::{is_in_scope, parse_seed_url, SeedTarget};
