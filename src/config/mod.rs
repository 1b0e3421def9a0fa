//! Configuration module for Site-Snapshot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so running without a file is the common case.
//!
//! # Example
//!
//! ```no_run
//! use site_snapshot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("snapshot.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CleanupConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
