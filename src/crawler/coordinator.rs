//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Managing the breadth-first frontier
//! - Coordinating fetching, parsing, and link extraction
//! - Writing one markdown file per page
//! - Recording failures for the end-of-run summary

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, PageFetcher, MAX_REDIRECTS};
use crate::crawler::parser::parse_page;
use crate::crawler::state::CrawlState;
use crate::crawler::Page;
use crate::extract::Extractor;
use crate::output::{ensure_output_dir, CrawlStats, FailureKind, PageFailure, PageWriter};
use crate::url::LinkResolver;
use crate::Result;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the crawl state for one invocation. Pages are fetched one at a time
/// in frontier order.
pub struct Coordinator<F: PageFetcher> {
    fetcher: F,
    extractor: Extractor,
    resolver: LinkResolver,
    writer: PageWriter,
    state: CrawlState,
    stats: CrawlStats,
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// `start` must already be normalized; it becomes the only entry of the
    /// frontier, at depth 0.
    pub fn new(start: Url, config: &Config, fetcher: F) -> Self {
        Self {
            fetcher,
            extractor: Extractor::from_config(config),
            resolver: LinkResolver::from_config(&config.crawl, &config.url),
            writer: PageWriter::new(&config.crawl.output_dir),
            state: CrawlState::new(start, config.crawl.max_depth, config.crawl.allow_external),
            stats: CrawlStats::new(),
        }
    }

    /// Runs the main crawl loop until the frontier is empty
    ///
    /// # Errors
    ///
    /// Fails only if the output directory cannot be created or written, and
    /// then before the first fetch. Page-level failures are recorded in the
    /// returned statistics.
    pub async fn run(mut self) -> Result<CrawlStats> {
        ensure_output_dir(self.writer.dir())?;

        tracing::info!(
            "Starting crawl of {} (max depth {}, external links {})",
            self.state.origin_host(),
            self.state.max_depth(),
            if self.state.allow_external() { "allowed" } else { "ignored" }
        );

        let mut pages_processed = 0;

        while let Some((url, depth)) = self.state.next() {
            self.process_url(url, depth).await;
            pages_processed += 1;

            // Progress reporting every 10 pages
            if pages_processed % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier",
                    pages_processed,
                    self.state.frontier_len()
                );
            }
        }

        tracing::info!("Frontier is empty, crawl complete");

        self.stats.finish();
        tracing::info!(
            "Crawl completed: {} URLs visited, {} pages written, {} failed in {:.1}s",
            self.state.visited_count(),
            self.stats.pages_written(),
            self.stats.failures.len(),
            self.stats.elapsed_secs()
        );

        Ok(self.stats)
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page, following redirects one hop at a time
    /// 2. Extracts title, markdown and (below max depth) links
    /// 3. Writes the page file
    /// 4. Enqueues unseen links at the next depth
    async fn process_url(&mut self, url: Url, depth: u32) {
        tracing::info!("Fetching {} (depth: {})", url, depth);

        let mut target = url.clone();
        let mut chain = vec![url.clone()];

        loop {
            match self.fetcher.fetch(&target).await {
                FetchResult::Success { body, .. } => {
                    self.handle_page(url, depth, &target, &body);
                    return;
                }

                FetchResult::Redirect { location, .. } => {
                    if chain.len() > MAX_REDIRECTS {
                        self.record_failure(
                            &url,
                            depth,
                            FailureKind::Network,
                            format!("Too many redirects (more than {})", MAX_REDIRECTS),
                        );
                        return;
                    }
                    match self.claim_redirect(&mut chain, &location) {
                        Ok(true) => target = location,
                        Ok(false) => {
                            self.stats.duplicate_redirects += 1;
                            return;
                        }
                        Err(detail) => {
                            self.record_failure(&url, depth, FailureKind::Network, detail);
                            return;
                        }
                    }
                }

                FetchResult::ContentMismatch { content_type } => {
                    self.record_failure(
                        &url,
                        depth,
                        FailureKind::ContentType,
                        format!("Expected HTML, got {}", content_type),
                    );
                    return;
                }

                FetchResult::HttpError { status_code } => {
                    self.record_failure(
                        &url,
                        depth,
                        FailureKind::HttpStatus,
                        format!("HTTP {}", status_code),
                    );
                    return;
                }

                FetchResult::NetworkError { error, timed_out } => {
                    let kind = if timed_out {
                        FailureKind::Timeout
                    } else {
                        FailureKind::Network
                    };
                    self.record_failure(&url, depth, kind, error);
                    return;
                }
            }
        }
    }

    /// Converts and writes a fetched page, then follows its links
    ///
    /// `base` is the URL the body was actually served from, so relative
    /// links resolve the way a browser would.
    fn handle_page(&mut self, url: Url, depth: u32, base: &Url, body: &str) {
        let follow = self.state.should_follow(depth);
        let parsed = parse_page(body, base, &self.extractor, follow);

        let page = Page {
            url,
            depth,
            title: parsed.title,
            markdown_body: parsed.markdown,
        };
        self.write_page(&page);

        if follow {
            self.handle_discovered_links(base, &parsed.links, depth);
        }
    }

    /// Decides whether the next redirect hop to `location` is followed
    ///
    /// `chain` holds the normalized URLs of this request so far, starting
    /// with the requested URL. A new target is marked visited before it is
    /// fetched. Returns `Ok(false)` when another page already claimed it, and
    /// an error when the target is not a crawlable URL.
    fn claim_redirect(
        &mut self,
        chain: &mut Vec<Url>,
        location: &Url,
    ) -> std::result::Result<bool, String> {
        let normalized = self
            .resolver
            .normalizer()
            .normalize(location.clone())
            .map_err(|e| format!("Invalid redirect target {}: {}", location, e))?;

        if !chain.contains(&normalized) && !self.state.mark_visited(&normalized) {
            tracing::info!(
                "Skipping {}: redirects to already visited {}",
                chain[0],
                normalized
            );
            return Ok(false);
        }

        tracing::debug!("{} redirected to {}", chain[0], normalized);
        chain.push(normalized);
        Ok(true)
    }

    fn write_page(&mut self, page: &Page) {
        match self.writer.write(page) {
            Ok(path) => {
                tracing::info!("  Saved {}", path.display());
                self.stats.written.push(path);
            }
            Err(e) => {
                tracing::warn!("Failed to write page {}: {}", page.url, e);
                self.stats.write_failures += 1;
            }
        }
    }

    /// Handles discovered links from a page
    ///
    /// Links are resolved, filtered by scope and skip patterns, and enqueued
    /// in document order unless already seen.
    fn handle_discovered_links(&mut self, base: &Url, links: &[String], depth: u32) {
        let resolved = self.resolver.resolve_ordered(
            base,
            links,
            self.state.allow_external(),
            self.state.origin_host(),
        );

        let mut added = 0;
        for link in resolved {
            if self.state.enqueue(link, depth + 1) {
                added += 1;
            }
        }

        self.stats.links_enqueued += added;
        tracing::debug!("Found {} links, {} new", links.len(), added);
    }

    fn record_failure(&mut self, url: &Url, depth: u32, kind: FailureKind, detail: String) {
        tracing::warn!("Error fetching {}: {}", url, detail);
        self.stats.record_failure(PageFailure {
            url: url.to_string(),
            depth,
            kind,
            detail,
        });
    }
}
