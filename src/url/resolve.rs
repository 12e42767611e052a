//! Link resolution
//!
//! Turns the raw `href` values found on a page into the set of normalized,
//! absolute, in-scope URLs that are candidates for the crawl frontier.

use crate::config::{CrawlConfig, UrlConfig};
use crate::url::normalize::UrlNormalizer;
use crate::url::is_same_host;
use std::collections::HashSet;
use url::Url;

/// Resolves raw hyperlinks into crawlable URLs
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    normalizer: UrlNormalizer,
    skip_path_keywords: Vec<String>,
    skip_extensions: Vec<String>,
}

impl LinkResolver {
    /// Creates a resolver with explicit skip patterns
    pub fn new(
        normalizer: UrlNormalizer,
        skip_path_keywords: Vec<String>,
        skip_extensions: Vec<String>,
    ) -> Self {
        Self {
            normalizer,
            skip_path_keywords: lowercase_all(skip_path_keywords),
            skip_extensions: lowercase_all(skip_extensions),
        }
    }

    /// Builds a resolver from the crawl and URL configuration sections
    pub fn from_config(crawl: &CrawlConfig, url: &UrlConfig) -> Self {
        Self::new(
            UrlNormalizer::new(url.tracking_params.clone()),
            crawl.skip_path_keywords.clone(),
            crawl.skip_extensions.clone(),
        )
    }

    /// Returns the normalizer used for every resolved URL
    pub fn normalizer(&self) -> &UrlNormalizer {
        &self.normalizer
    }

    /// Resolves raw hrefs against `base_url`
    ///
    /// # Rules
    ///
    /// - Relative and protocol-relative hrefs are resolved against the base
    /// - Empty and fragment-only hrefs are dropped
    /// - Non-http(s) schemes (mailto:, javascript:, tel:, data:, ...) are dropped
    /// - Every surviving URL is normalized
    /// - URLs matching a skip pattern (login pages, downloads) are dropped
    /// - If `allow_external` is false, URLs on another host than `origin_host` are dropped
    ///
    /// Malformed hrefs are dropped silently. The result has no particular order;
    /// see [`LinkResolver::resolve_ordered`] for first-seen order.
    pub fn resolve<I, S>(
        &self,
        base_url: &Url,
        raw_hrefs: I,
        allow_external: bool,
        origin_host: &str,
    ) -> HashSet<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve_ordered(base_url, raw_hrefs, allow_external, origin_host)
            .into_iter()
            .collect()
    }

    /// Same as [`LinkResolver::resolve`], but keeps the order in which URLs
    /// first appear in `raw_hrefs`
    pub fn resolve_ordered<I, S>(
        &self,
        base_url: &Url,
        raw_hrefs: I,
        allow_external: bool,
        origin_host: &str,
    ) -> Vec<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for raw in raw_hrefs {
            let raw = raw.as_ref();

            let Some(absolute) = resolve_href(raw, base_url) else {
                tracing::trace!("Dropping unresolvable href {:?}", raw);
                continue;
            };

            let normalized = match self.normalizer.normalize(absolute) {
                Ok(n) => n,
                Err(e) => {
                    tracing::trace!("Dropping href {:?}: {}", raw, e);
                    continue;
                }
            };

            if self.is_skipped(&normalized) {
                tracing::trace!("Skipping non-content URL {}", normalized);
                continue;
            }

            if !allow_external && !is_same_host(&normalized, origin_host) {
                continue;
            }

            if seen.insert(normalized.clone()) {
                resolved.push(normalized);
            }
        }

        resolved
    }

    /// Returns true when the URL matches a skip keyword or download extension
    pub fn is_skipped(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();

        self.skip_path_keywords.iter().any(|k| path.contains(k.as_str()))
            || self.skip_extensions.iter().any(|e| path.ends_with(e.as_str()))
    }
}

/// Resolves raw hrefs with the default resolver settings
///
/// # Examples
///
/// ```
/// use md_harvest::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/x/").unwrap();
/// let urls = resolve(&base, ["../y", "//a.com/z", "#frag", "mailto:a@b.com"], false, "a.com");
/// assert_eq!(urls.len(), 2);
/// ```
pub fn resolve<I, S>(
    base_url: &Url,
    raw_hrefs: I,
    allow_external: bool,
    origin_host: &str,
) -> HashSet<Url>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    LinkResolver::default().resolve(base_url, raw_hrefs, allow_external, origin_host)
}

/// Resolves a single href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - hrefs that fail to parse against the base
/// - non-HTTP(S) URLs after resolution
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Makes an href absolute for display in extracted markdown
///
/// http(s) targets are resolved and normalized; other schemes (mailto:, tel:)
/// and unparseable hrefs are returned verbatim. Scope is never checked here.
pub fn absolutize_href(href: &str, base_url: &Url, normalizer: &UrlNormalizer) -> String {
    let href = href.trim();

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            match normalizer.normalize(absolute) {
                Ok(normalized) => normalized.to_string(),
                Err(_) => href.to_string(),
            }
        }
        _ => href.to_string(),
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}
