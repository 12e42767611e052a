//! Configuration module for md-harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a missing file is the
//! same as an empty one; command-line flags override file values.
//!
//! # Example
//!
//! ```no_run
//! use md_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, ExtractConfig, SplitConfig, UrlConfig};

// Re-export parser and validation functions
pub use parser::{load_config, load_config_or_default};
pub use validation::{validate, validate_max_level, validate_start_url};
