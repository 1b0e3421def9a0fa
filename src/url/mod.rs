//! URL handling module for Site-Snapshot
//!
//! This module provides seed validation, link normalization, same-domain scoping,
//! and the extension-based page/resource classification.

mod domain;
mod normalize;
mod scope;

use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_link, parse_seed_url};
pub use scope::is_in_scope;

/// Path suffixes treated as static resources rather than pages
pub const RESOURCE_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".ico", ".svg",
];

/// The starting point of a crawl and the domain that bounds it
///
/// Built once from the seed URL and never mutated while the crawl runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    /// The seed URL, normalized
    pub url: Url,

    /// Lowercase host used for scope decisions
    pub base_domain: String,
}

impl SeedTarget {
    /// Parses and validates a seed URL and derives its base domain
    ///
    /// # Examples
    ///
    /// ```
    /// use site_snapshot::url::SeedTarget;
    ///
    /// let seed = SeedTarget::parse("https://Example.com/docs#intro").unwrap();
    /// assert_eq!(seed.base_domain, "example.com");
    /// assert_eq!(seed.url.as_str(), "https://example.com/docs");
    /// ```
    pub fn parse(seed_url: &str) -> crate::UrlResult<Self> {
        let url = parse_seed_url(seed_url)?;
        let base_domain = extract_domain(&url).ok_or(crate::UrlError::MissingHost)?;

        Ok(Self {
            base_domain,
            url,
        })
    }

    /// Returns true if `candidate` falls within this seed's domain
    pub fn contains(&self, candidate: &Url) -> bool {
        is_in_scope(candidate, &self.base_domain)
    }
}

/// What a URL is expected to hold, judged from its path suffix alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// HTML page: counts against the page budget and is parsed for links
    Page,
    /// Static resource: persisted but never parsed
    Resource,
}

/// Classifies a URL as page or resource by its path extension
///
/// This is a heuristic. A stylesheet served from an extensionless path is
/// classified as a page and its body is offered to the link extractor, which
/// only parses it when the response declares an HTML content type.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_snapshot::url::{classify_url, ContentKind};
///
/// let css = Url::parse("https://example.com/static/site.css").unwrap();
/// assert_eq!(classify_url(&css), ContentKind::Resource);
///
/// let page = Url::parse("https://example.com/about").unwrap();
/// assert_eq!(classify_url(&page), ContentKind::Page);
/// ```
pub fn classify_url(url: &Url) -> ContentKind {
    let path = url.path().to_ascii_lowercase();

    if RESOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        ContentKind::Resource
    } else {
        ContentKind::Page
    }
}
