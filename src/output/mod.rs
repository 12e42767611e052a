//! Output module for writing results and run summaries
//!
//! This module handles:
//! - Deriving safe, unique file names for pages and chunks
//! - Writing page and chunk files to flat output directories
//! - Recording run statistics and printing summaries

mod naming;
pub mod stats;
mod writer;

pub use naming::{chunk_file_stem, page_file_stem, slugify, FileNamer};
pub use stats::{
    print_crawl_summary, print_split_summary, CrawlStats, FailureKind, PageFailure, SplitStats,
};
pub use writer::{ensure_output_dir, format_chunk, format_page, ChunkWriter, PageWriter};
