use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host portion of the URL, or `None` when the URL has
/// no host (`mailto:`, `data:` and similar).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_snapshot::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
