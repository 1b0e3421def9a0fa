//! Site-Snapshot main entry point
//!
//! Command-line front end: snapshots one website into a zip archive.

use anyhow::Context;
use clap::Parser;
use site_snapshot::config::{load_config_or_default, validate, Config};
use site_snapshot::output::{print_statistics, CrawlStatistics};
use site_snapshot::service::{LocalDelivery, SnapshotService};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Snapshot: a bounded website capture engine
///
/// Fetches pages and same-domain resources breadth-first from the given URL,
/// stops at the page and byte limits, and writes the result as a zip archive.
#[derive(Parser, Debug)]
#[command(name = "site-snapshot")]
#[command(version = "1.0.0")]
#[command(about = "Download a bounded snapshot of a website as a zip archive", long_about = None)]
struct Cli {
    /// Website to download, e.g. https://example.com
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the finished archive is copied into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Override the maximum number of pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the maximum number of bytes downloaded in total
    #[arg(long, value_name = "N")]
    max_bytes: Option<u64>,

    /// Seconds to keep the working files after delivery
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    linger: u64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let service = SnapshotService::new(config, LocalDelivery::new(&cli.output))
        .context("Failed to set up the snapshot service")?;

    let receipt = service
        .submit(std::process::id() as u64, &cli.url)
        .await
        .with_context(|| format!("Snapshot of {} failed", cli.url))?;

    if !cli.quiet {
        let stats = CrawlStatistics::from_report(&receipt.report);
        print_statistics(&stats, Some(&receipt.archive));
        println!("{}", receipt.caption);
        println!("Saved {}", receipt.delivered_to);
    }

    if let Err(e) = receipt.cleanup.await {
        tracing::error!("Cleanup task failed: {}", e);
    }

    Ok(())
}

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_bytes) = cli.max_bytes {
        config.crawler.max_total_bytes = max_bytes;
    }
    config.cleanup.grace_period_secs = cli.linger;

    validate(&config).context("Invalid command-line overrides")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_snapshot=info,warn"),
            1 => EnvFilter::new("site_snapshot=debug,info"),
            2 => EnvFilter::new("site_snapshot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
