//! HTML page parsing for the crawler
//!
//! This module turns a fetched HTML body into:
//! - The page title and markdown body (via the [`Extractor`])
//! - The raw hrefs of links to follow

use crate::extract::Extractor;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title
    pub title: String,

    /// Cleaned markdown of the main content
    pub markdown: String,

    /// Raw `href` values of links inside the main content, in document order
    pub links: Vec<String>,
}

/// Parses HTML content, extracting content and (optionally) links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags inside the page's main content container
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - Anything outside the main content (site navigation, footers, ...)
///
/// Hrefs are returned verbatim; resolving and filtering them is the link
/// resolver's job. With `follow_links` false no links are collected.
///
/// # Example
///
/// ```
/// use md_harvest::crawler::parse_page;
/// use md_harvest::extract::Extractor;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &url, &Extractor::default(), true);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["/page"]);
/// ```
pub fn parse_page(html: &str, url: &Url, extractor: &Extractor, follow_links: bool) -> ParsedPage {
    let document = Html::parse_document(html);

    let content = extractor.extract(&document, url);
    let links = if follow_links {
        extract_links(&document, extractor)
    } else {
        Vec::new()
    };

    ParsedPage {
        title: content.title,
        markdown: content.markdown,
        links,
    }
}

/// Collects raw hrefs from anchors inside the main content container
fn extract_links(document: &Html, extractor: &Extractor) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    extractor
        .content_root(document)
        .select(&a_selector)
        // Skip if it has the download attribute
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
