//! URL handling module for md-harvest
//!
//! This module provides URL normalization and the link resolver that decides
//! which hyperlinks on a page are worth crawling next.

mod normalize;
mod resolve;

// Re-export main functions
pub use normalize::{normalize_url, UrlNormalizer, DEFAULT_TRACKING_PARAMS};
pub use resolve::{absolutize_href, resolve, resolve_href, LinkResolver};

use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use md_harvest::url::host_of;
///
/// let url = Url::parse("https://Docs.Example.COM/path").unwrap();
/// assert_eq!(host_of(&url), Some("docs.example.com".to_string()));
/// ```
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true when `url` lives on `origin_host` (case-insensitive, port ignored)
pub fn is_same_host(url: &Url, origin_host: &str) -> bool {
    url.host_str()
        .map(|h| h.eq_ignore_ascii_case(origin_host))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(host_of(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_same_host_ignores_case_and_port() {
        let url = Url::parse("https://EXAMPLE.com:8443/page").unwrap();
        assert!(is_same_host(&url, "example.com"));
        assert!(is_same_host(&url, "Example.Com"));
        assert!(!is_same_host(&url, "other.com"));
    }

    #[test]
    fn test_subdomain_is_a_different_host() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert!(!is_same_host(&url, "example.com"));
    }
}
