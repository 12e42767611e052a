//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] trait
//! - HTML parsing and link extraction
//! - Breadth-first frontier and visited-set bookkeeping
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod state;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, is_html_content_type, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{parse_page, ParsedPage};
pub use state::CrawlState;

use crate::config::{validate, validate_start_url, Config};
use crate::output::CrawlStats;
use crate::url::UrlNormalizer;
use crate::Result;
use url::Url;

/// One crawled page, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The normalized URL the page was requested under
    pub url: Url,

    /// Link distance from the start URL
    pub depth: u32,

    pub title: String,

    /// Cleaned markdown of the main content (may be empty)
    pub markdown_body: String,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and the start URL
/// 2. Create the output directory
/// 3. Build the HTTP client
/// 4. Fetch pages breadth-first, writing one markdown file per page
///
/// # Errors
///
/// Configuration problems (invalid start URL, invalid settings), an
/// unusable output directory and a failure to build the HTTP client are
/// returned before any page is fetched. Failures of individual pages are
/// not errors; they are listed in the returned [`CrawlStats`].
///
/// # Example
///
/// ```no_run
/// use md_harvest::config::Config;
/// use md_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = crawl("https://example.com/docs", &Config::default()).await?;
/// println!("{} pages written", stats.pages_written());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(start: &str, config: &Config) -> Result<CrawlStats> {
    validate(config)?;

    let start = validate_start_url(start)?;
    let start = UrlNormalizer::new(config.url.tracking_params.clone()).normalize(start)?;

    let fetcher = HttpFetcher::new(&config.crawl)?;
    Coordinator::new(start, config, fetcher).run().await
}
