//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests with a bounded body read
//! - Error classification into `FetchResult` variants
//!
//! The fetcher knows nothing about the crawl: one call, one GET, no retries.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The full body was read within the byte cap
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Response body
        body: Vec<u8>,
    },

    /// The body exceeded the byte cap; nothing is returned
    TooLarge {
        /// The cap that was exceeded
        limit: u64,
        /// Bytes seen (or declared) when the read was abandoned
        received: u64,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, broken body, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the client timeout
        timed_out: bool,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Crawler configuration (request timeout)
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_snapshot::config::Config;
/// use site_snapshot::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_secs);

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, reading at most `max_bytes` of body
///
/// # Request Flow
///
/// 1. Send GET request (redirects followed by the client)
/// 2. Non-2xx status → `HttpError`
/// 3. Declared Content-Length above the cap → `TooLarge` without reading
/// 4. Read the body chunk by chunk; the running total is checked after every
///    chunk and the read stops as soon as it passes the cap → `TooLarge`
///
/// Timeouts and transport failures become `NetworkError`. Nothing is retried.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `max_bytes` - Per-resource byte cap
pub async fn fetch_url(client: &Client, url: &Url, max_bytes: u64) -> FetchResult {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => return network_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    if let Some(declared) = response.content_length() {
        if declared > max_bytes {
            return FetchResult::TooLarge {
                limit: max_bytes,
                received: declared,
            };
        }
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match read_bounded(response, max_bytes).await {
        Ok(Some(body)) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Ok(None) => FetchResult::TooLarge {
            limit: max_bytes,
            received: max_bytes + 1,
        },
        Err(e) => network_error(e),
    }
}

/// Reads the body in chunks, returning `Ok(None)` once it passes `max_bytes`
async fn read_bounded(
    mut response: Response,
    max_bytes: u64,
) -> Result<Option<Vec<u8>>, reqwest::Error> {
    let mut body = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        if (body.len() + chunk.len()) as u64 > max_bytes {
            return Ok(None);
        }
        body.extend_from_slice(&chunk);
    }

    Ok(Some(body))
}

fn network_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            timed_out: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            timed_out: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            timed_out: false,
        }
    }
}
