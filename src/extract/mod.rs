//! Content extraction
//!
//! Given a parsed page, this module picks the main content container, drops
//! boilerplate using the noise predicates in [`noise`], and renders what is
//! left as markdown.

mod markdown;
pub mod noise;

pub use noise::{KeywordPredicate, NoiseFilter, NoisePredicate, RolePredicate, TagPredicate};

use crate::config::Config;
use crate::url::UrlNormalizer;
use markdown::MarkdownRenderer;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Candidate main-content containers, most specific first
const CONTENT_ROOT_SELECTORS: &[&str] = &["#content", "main", "article", "div.content", "body"];

/// Result of extracting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Page title (`<title>`, first `<h1>`, or derived from the URL)
    pub title: String,

    /// Cleaned markdown of the main content (may be empty)
    pub markdown: String,
}

/// Converts parsed HTML pages into a title and a markdown body
#[derive(Debug, Default)]
pub struct Extractor {
    noise: NoiseFilter,
    normalizer: UrlNormalizer,
}

impl Extractor {
    /// Creates an extractor from an explicit noise filter and URL normalizer
    pub fn new(noise: NoiseFilter, normalizer: UrlNormalizer) -> Self {
        Self { noise, normalizer }
    }

    /// Builds an extractor from the `[extract]` and `[url]` configuration sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            NoiseFilter::from_config(&config.extract),
            UrlNormalizer::new(config.url.tracking_params.clone()),
        )
    }

    /// Extracts the title and markdown body of a page
    ///
    /// Never fails: a page without extractable content gives an empty body
    /// and, lacking `<title>` and `<h1>`, a title derived from the URL.
    ///
    /// # Example
    ///
    /// ```
    /// use md_harvest::extract::Extractor;
    /// use scraper::Html;
    /// use url::Url;
    ///
    /// let html = Html::parse_document("<html><head><title>Docs</title></head><body><p>Hi</p></body></html>");
    /// let url = Url::parse("https://example.com/docs").unwrap();
    /// let content = Extractor::default().extract(&html, &url);
    /// assert_eq!(content.title, "Docs");
    /// assert_eq!(content.markdown, "Hi");
    /// ```
    pub fn extract(&self, document: &Html, url: &Url) -> ExtractedContent {
        let title = extract_title(document).unwrap_or_else(|| title_from_url(url));

        let root = self.content_root(document);
        let renderer = MarkdownRenderer::new(url, &self.normalizer, &self.noise);
        let markdown = renderer.render(root);

        ExtractedContent { title, markdown }
    }

    /// Picks the element whose subtree holds the page's main content
    ///
    /// Tries `#content`, `main`, `article`, `div.content` and `body` in
    /// order, falling back to the document root.
    pub fn content_root<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        CONTENT_ROOT_SELECTORS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .find_map(|selector| document.select(&selector).next())
            .unwrap_or_else(|| document.root_element())
    }
}

/// Extracts a page with the default heuristics
pub fn extract(document: &Html, url: &Url) -> ExtractedContent {
    Extractor::default().extract(document, url)
}

/// Extracts the page title: first non-empty `<title>`, then first non-empty `<h1>`
fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .map(|element| {
                    element
                        .text()
                        .collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .find(|s| !s.is_empty())
        })
}

/// Derives a title from the URL path, or the host for the site root
pub fn title_from_url(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    if !path.is_empty() {
        return path.to_string();
    }

    url.host_str()
        .map(|h| h.to_string())
        .unwrap_or_else(|| url.to_string())
}
