use crate::{UrlError, UrlResult};
use url::Url;

/// Tracking query parameters removed during normalization by default
///
/// Any parameter starting with `utm_` is removed as well, whether listed or not.
pub const DEFAULT_TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "dclid",
    "msclkid",
    "mc_cid",
    "mc_eid",
    "_ga",
    "_hsenc",
    "_hsmi",
    "igshid",
    "ref",
    "source",
];

/// Normalizes URLs so that equivalent links compare equal
///
/// # Normalization Steps
///
/// 1. Reject anything that is not http or https
/// 2. Reject URLs without a host
/// 3. Normalize path:
///    - Remove dot segments (. and ..) and empty segments
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters
/// 6. Sort remaining query parameters by key
/// 7. Remove empty query string (trailing ?)
///
/// Hosts are already lowercased by the `url` parser for http(s).
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    tracking_params: Vec<String>,
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKING_PARAMS.iter().map(|p| p.to_string()).collect())
    }
}

impl UrlNormalizer {
    /// Creates a normalizer that strips the given tracking parameters
    pub fn new(tracking_params: Vec<String>) -> Self {
        Self { tracking_params }
    }

    /// Normalizes an already-parsed URL
    pub fn normalize(&self, mut url: Url) -> UrlResult<Url> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(UrlError::MissingDomain),
        }

        let normalized_path = normalize_path(url.path());
        url.set_path(&normalized_path);

        url.set_fragment(None);

        if url.query().is_some() {
            let params = self.filter_and_sort_query_params(&url);

            if params.is_empty() {
                url.set_query(None);
            } else {
                url.query_pairs_mut().clear().extend_pairs(params);
            }
        }

        Ok(url)
    }

    /// Parses and normalizes a URL string
    pub fn normalize_str(&self, url_str: &str) -> UrlResult<Url> {
        let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
        self.normalize(url)
    }

    /// Filters out tracking parameters and sorts remaining query parameters
    fn filter_and_sort_query_params(&self, url: &Url) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !self.is_tracking_param(key))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        params.sort_by(|a, b| a.0.cmp(&b.0));

        params
    }

    /// Checks if a query parameter is a tracking parameter
    fn is_tracking_param(&self, key: &str) -> bool {
        key.starts_with("utm_") || self.tracking_params.iter().any(|p| p == key)
    }
}

/// Normalizes a URL string with the default tracking parameter list
///
/// # Examples
///
/// ```
/// use md_harvest::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/docs/?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    UrlNormalizer::default().normalize_str(url_str)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}
