//! Run statistics and end-of-run summaries
//!
//! Both operations keep counters while they run and print a short summary
//! to stdout when they finish.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Why a page produced no output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// DNS, connection or TLS failure
    Network,

    /// The request exceeded its timeout
    Timeout,

    /// The server answered with a non-2xx status
    HttpStatus,

    /// The response was not HTML
    ContentType,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Network => "network error",
            FailureKind::Timeout => "timeout",
            FailureKind::HttpStatus => "HTTP error",
            FailureKind::ContentType => "not HTML",
        };
        f.write_str(label)
    }
}

/// One page that could not be fetched or converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub url: String,
    pub depth: u32,
    pub kind: FailureKind,
    pub detail: String,
}

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Page files written, in visit order
    pub written: Vec<PathBuf>,

    /// Pages that failed to fetch, in visit order
    pub failures: Vec<PageFailure>,

    /// Pages fetched and converted but not written
    pub write_failures: u64,

    /// Distinct links discovered and queued
    pub links_enqueued: u64,

    /// URLs dropped because they redirect to a page already visited
    pub duplicate_redirects: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            written: Vec::new(),
            failures: Vec::new(),
            write_failures: 0,
            links_enqueued: 0,
            duplicate_redirects: 0,
        }
    }

    /// Number of page files written
    pub fn pages_written(&self) -> usize {
        self.written.len()
    }

    /// Number of pages fetched, successfully or not
    pub fn pages_visited(&self) -> usize {
        self.written.len() + self.failures.len() + self.write_failures as usize
    }

    pub fn record_failure(&mut self, failure: PageFailure) {
        self.failures.push(failure);
    }

    /// Failure counts grouped by kind
    pub fn failures_by_kind(&self) -> HashMap<FailureKind, u64> {
        let mut counts = HashMap::new();
        for failure in &self.failures {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Elapsed wall-clock time in seconds (up to now if still running)
    pub fn elapsed_secs(&self) -> f64 {
        elapsed_secs(self.started_at, self.finished_at)
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one split run
#[derive(Debug, Clone)]
pub struct SplitStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Markdown files read and segmented
    pub files_processed: u64,

    /// Files that could not be read
    pub files_failed: u64,

    /// Chunk files written, in emission order
    pub written: Vec<PathBuf>,

    /// Chunks that could not be written
    pub write_failures: u64,
}

impl SplitStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            files_processed: 0,
            files_failed: 0,
            written: Vec::new(),
            write_failures: 0,
        }
    }

    pub fn chunks_written(&self) -> usize {
        self.written.len()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_secs(&self) -> f64 {
        elapsed_secs(self.started_at, self.finished_at)
    }
}

impl Default for SplitStats {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_secs(started: DateTime<Utc>, finished: Option<DateTime<Utc>>) -> f64 {
    let end = finished.unwrap_or_else(Utc::now);
    (end - started).num_milliseconds().max(0) as f64 / 1000.0
}

/// Prints a crawl summary to stdout
pub fn print_crawl_summary(stats: &CrawlStats) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Elapsed: {:.1}s", stats.elapsed_secs());
    println!("  Pages visited: {}", stats.pages_visited());
    println!("  Pages written: {}", stats.pages_written());
    println!("  Links enqueued: {}", stats.links_enqueued);
    if stats.duplicate_redirects > 0 {
        println!("  Redirects to visited pages: {}", stats.duplicate_redirects);
    }
    println!();

    if !stats.failures.is_empty() {
        println!("Failures:");
        // Sort kinds by count (descending)
        let mut kind_counts: Vec<_> = stats.failures_by_kind().into_iter().collect();
        kind_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (kind, count) in kind_counts {
            println!("  {}: {}", kind, count);
        }
        println!();

        for failure in &stats.failures {
            println!("  - {} ({})", failure.url, failure.detail);
        }
        println!();
    }

    if stats.write_failures > 0 {
        println!("Write failures: {}", stats.write_failures);
        println!();
    }

    let visited = stats.pages_visited();
    let success_rate = if visited > 0 {
        (stats.pages_written() as f64 / visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages written)",
        success_rate,
        stats.pages_written(),
        visited
    );
}

/// Prints a split summary to stdout
pub fn print_split_summary(stats: &SplitStats) {
    println!("=== Split Summary ===\n");
    println!("  Elapsed: {:.1}s", stats.elapsed_secs());
    println!("  Files processed: {}", stats.files_processed);
    if stats.files_failed > 0 {
        println!("  Files failed: {}", stats.files_failed);
    }
    println!("  Chunks written: {}", stats.chunks_written());
    if stats.write_failures > 0 {
        println!("  Write failures: {}", stats.write_failures);
    }
}
