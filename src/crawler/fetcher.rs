//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests, with redirects reported rather than followed
//! - Content-Type checks (only HTML is converted)
//! - Error classification

use crate::config::CrawlConfig;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects the crawler follows for one page
pub const MAX_REDIRECTS: usize = 10;

/// Connect timeout, separate from the per-request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, if the server sent one
        content_type: Option<String>,
        /// Page body content
        body: String,
    },

    /// Server answered with a 3xx status and a usable `Location`
    ///
    /// The caller decides whether to follow it, so a redirect target that
    /// was already crawled is never requested again.
    Redirect {
        /// Redirect target, resolved against the requested URL
        location: Url,
        /// The HTTP status code
        status_code: u16,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (DNS, connection refused, TLS, timeout, too many redirects)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request timed out
        timed_out: bool,
    },
}

/// Source of page content for the crawler
///
/// The crawl coordinator only talks to this trait, so tests can serve
/// pages from memory.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL; never fails, failures are reported in the result
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use md_harvest::config::CrawlConfig;
/// use md_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header denotes HTML
///
/// A missing header is treated as HTML. Parameters such as `charset` are
/// ignored.
pub fn is_html_content_type(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return true;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "text/html" || essence == "application/xhtml+xml"
}

/// Page fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a client configured from the crawl section
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// # Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx, HTML or no Content-Type | Success |
    /// | 2xx, other Content-Type | ContentMismatch |
    /// | 3xx with a valid Location | Redirect |
    /// | any other status | HttpError |
    /// | timeout | NetworkError (timed_out) |
    /// | DNS, connect, TLS | NetworkError |
    async fn fetch(&self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(e),
        };

        let status = response.status();
        if status.is_redirection() {
            if let Some(location) = redirect_location(url, response.headers()) {
                return FetchResult::Redirect {
                    location,
                    status_code: status.as_u16(),
                };
            }
        }
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if !is_html_content_type(content_type.as_deref()) {
            return FetchResult::ContentMismatch {
                content_type: content_type.unwrap_or_default(),
            };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => classify_error(e),
        }
    }
}

/// Resolves a `Location` header against the URL that was requested
fn redirect_location(requested: &Url, headers: &header::HeaderMap) -> Option<Url> {
    let value = headers.get(header::LOCATION)?.to_str().ok()?;
    requested.join(value.trim()).ok()
}

fn classify_error(e: reqwest::Error) -> FetchResult {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_redirect_location() {
        let requested = Url::parse("https://a.com/docs/old").unwrap();
        let mut headers = header::HeaderMap::new();
        assert_eq!(redirect_location(&requested, &headers), None);

        headers.insert(header::LOCATION, header::HeaderValue::from_static("new/"));
        assert_eq!(
            redirect_location(&requested, &headers).unwrap().as_str(),
            "https://a.com/docs/new/"
        );

        headers.insert(
            header::LOCATION,
            header::HeaderValue::from_static("https://b.com/x"),
        );
        assert_eq!(
            redirect_location(&requested, &headers).unwrap().as_str(),
            "https://b.com/x"
        );
    }

    #[test]
    fn test_html_content_types() {
        assert!(is_html_content_type(None));
        assert!(is_html_content_type(Some("text/html")));
        assert!(is_html_content_type(Some("text/html; charset=utf-8")));
        assert!(is_html_content_type(Some("Text/HTML")));
        assert!(is_html_content_type(Some("application/xhtml+xml")));
    }

    #[test]
    fn test_non_html_content_types() {
        assert!(!is_html_content_type(Some("application/pdf")));
        assert!(!is_html_content_type(Some("application/json")));
        assert!(!is_html_content_type(Some("text/plain")));
        assert!(!is_html_content_type(Some("")));
    }
}
