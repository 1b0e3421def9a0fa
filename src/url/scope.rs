use crate::url::extract_domain;
use url::Url;

/// Decides whether a candidate URL belongs to the crawl's domain
///
/// Rules, in order:
/// 1. A candidate without a host is out of scope
/// 2. The host equal to `base_domain`, or any subdomain of it, is in scope
/// 3. Everything else is out of scope
///
/// The check ignores scheme and port. It is a pure function of its arguments.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_snapshot::url::is_in_scope;
///
/// let page = Url::parse("https://docs.example.com/intro").unwrap();
/// assert!(is_in_scope(&page, "example.com"));
///
/// let other = Url::parse("https://notexample.com/").unwrap();
/// assert!(!is_in_scope(&other, "example.com"));
/// ```
pub fn is_in_scope(candidate: &Url, base_domain: &str) -> bool {
    let Some(host) = extract_domain(candidate) else {
        return false;
    };

    let base = base_domain.to_lowercase();
    if base.is_empty() {
        return false;
    }

    host == base || host.ends_with(&format!(".{}", base))
}
