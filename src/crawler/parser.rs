//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Every reference the snapshot may need (pages, stylesheets, scripts, media)
//! - Page title, for logging

use crate::url::normalize_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Element/attribute pairs whose value is a single URL reference
const SINGLE_URL_SOURCES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("source[src]", "src"),
    ("video[src]", "src"),
    ("audio[src]", "src"),
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Absolute, fragment-free URLs in document order, duplicates removed
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Sources
///
/// - `<a href>`, `<link href>` (stylesheets, icons, canonical, ...)
/// - `<script src>`
/// - `<img src>`, `<source src>`, `<video src>`, `<audio src>`
/// - `<img srcset>`: the first token of each comma-separated candidate
///
/// Every reference is resolved against `base_url`. Parsing is permissive:
/// malformed markup yields fewer links, never an error.
///
/// # Example
///
/// ```
/// use site_snapshot::crawler::parse_html;
/// use url::Url;
///
/// let html = br#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &[u8], base_url: &Url) -> ParsedPage {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all followable references from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut push = |url: Url| {
        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    };

    for (css, attr) in SINGLE_URL_SOURCES {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };

        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if let Some(url) = normalize_link(value, base_url) {
                    push(url);
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("img[srcset]") {
        for element in document.select(&selector) {
            if let Some(srcset) = element.value().attr("srcset") {
                for candidate in srcset_urls(srcset) {
                    if let Some(url) = normalize_link(candidate, base_url) {
                        push(url);
                    }
                }
            }
        }
    }

    links
}

/// Splits a `srcset` value into its URL tokens
///
/// `"a.png 1x, b.png 2x"` yields `["a.png", "b.png"]`.
fn srcset_urls(srcset: &str) -> impl Iterator<Item = &str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
}
