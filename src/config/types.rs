use serde::Deserialize;

/// Default page ceiling for a single crawl
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// Default total byte ceiling for a single crawl (50 MiB)
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 50 * 1024 * 1024;

/// Default per-file byte cap (5 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Main configuration structure for Site-Snapshot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

/// Crawler budget and transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of HTML pages persisted per crawl
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Maximum number of bytes persisted per crawl, pages and resources combined
    #[serde(rename = "max-total-bytes")]
    pub max_total_bytes: u64,

    /// Maximum size of a single persisted file
    #[serde(rename = "max-file-bytes")]
    pub max_file_bytes: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            request_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteSnapshot".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory under which each job gets its own download directory
    #[serde(rename = "work-dir")]
    pub work_dir: String,

    /// File name of the archive produced for each job
    #[serde(rename = "archive-name")]
    pub archive_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            work_dir: "site_download".to_string(),
            archive_name: "site_download.zip".to_string(),
        }
    }
}

/// Deferred cleanup configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Seconds to keep the archive and download directory after delivery
    #[serde(rename = "grace-period-secs")]
    pub grace_period_secs: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_budget() {
        let config = Config::default();
        assert_eq!(config.crawler.max_pages, 20);
        assert_eq!(config.crawler.max_total_bytes, 50 * 1024 * 1024);
        assert_eq!(config.crawler.max_file_bytes, 5 * 1024 * 1024);
        assert_eq!(config.cleanup.grace_period_secs, 180);
    }

    #[test]
    fn test_user_agent_header_value() {
        let mut ua = UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "TestCrawler/1.0");

        ua.contact_url = Some("https://example.com/about".to_string());
        assert_eq!(ua.header_value(), "TestCrawler/1.0 (+https://example.com/about)");
    }
}
