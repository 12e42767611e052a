//! Crawl state
//!
//! Holds the breadth-first frontier and the visited set for one crawl
//! invocation. URLs are expected to be normalized before they get here, so
//! string equality is URL identity.

use crate::url::host_of;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Frontier and visited bookkeeping for a single crawl
///
/// # Invariants
///
/// - A URL is enqueued at most once, so its depth is the depth at which it
///   was first discovered
/// - A URL is handed out by [`CrawlState::next`] at most once
/// - Nothing deeper than `max_depth` is ever enqueued
#[derive(Debug)]
pub struct CrawlState {
    visited: HashSet<String>,
    queued: HashSet<String>,
    frontier: VecDeque<(Url, u32)>,
    max_depth: u32,
    allow_external: bool,
    origin_host: String,
}

impl CrawlState {
    /// Creates the state for a crawl seeded with `start` at depth 0
    ///
    /// The origin host is the start URL's host.
    pub fn new(start: Url, max_depth: u32, allow_external: bool) -> Self {
        let origin_host = host_of(&start).unwrap_or_default();
        let mut state = Self {
            visited: HashSet::new(),
            queued: HashSet::new(),
            frontier: VecDeque::new(),
            max_depth,
            allow_external,
            origin_host,
        };
        state.enqueue(start, 0);
        state
    }

    /// Pops the next unvisited URL (FIFO) and marks it visited
    pub fn next(&mut self) -> Option<(Url, u32)> {
        while let Some((url, depth)) = self.frontier.pop_front() {
            if self.mark_visited(&url) {
                return Some((url, depth));
            }
        }
        None
    }

    /// Marks a URL visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Adds a URL to the back of the frontier
    ///
    /// Returns false (and does nothing) if the URL was already enqueued or
    /// visited, or if `depth` exceeds the maximum depth.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth || self.is_visited(&url) {
            return false;
        }
        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }
        self.frontier.push_back((url, depth));
        true
    }

    /// Returns true if links found at `depth` should be followed
    pub fn should_follow(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    pub fn allow_external(&self) -> bool {
        self.allow_external
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
