use crate::UrlError;
use url::Url;

/// Reference prefixes that never point at fetchable content
const IGNORED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Parses and validates a top-level seed URL
///
/// # Validation Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Drop the fragment
///
/// # Examples
///
/// ```
/// use site_snapshot::url::parse_seed_url;
///
/// let url = parse_seed_url("  https://example.com/#top ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
///
/// assert!(parse_seed_url("example.com").is_err());
/// ```
pub fn parse_seed_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);
    Ok(url)
}

/// Resolves a raw reference found in a page against that page's URL
///
/// Returns `None` when the reference should not be followed:
/// - empty or fragment-only references
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - references that fail to resolve
/// - non-HTTP(S) results
///
/// The fragment is always removed, so `/page#a` and `/page#b` collapse into
/// one candidate.
pub fn normalize_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let mut resolved = base_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved)
}
