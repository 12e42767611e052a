//! md-harvest: web pages to markdown, markdown to RAG chunks
//!
//! This crate implements two batch operations:
//! - `crawl`: a breadth-first crawler that extracts the main content of each
//!   HTML page and writes it as one markdown file per page
//! - `split`: a heading-aware splitter that turns markdown documents into
//!   heading-bounded chunk files for retrieval indexing

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod split;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for md-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output directory {path} is not usable: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input directory does not exist: {path}")]
    InputDir { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for md-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlState, Page};
pub use extract::{extract, Extractor};
pub use split::{emit, segment, split_directory, Chunk, HeadingNode};
pub use url::{normalize_url, resolve};
