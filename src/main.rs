//! md-harvest main entry point
//!
//! This is the command-line interface for crawling web pages into markdown
//! files and splitting markdown files into heading-bounded chunks.

use anyhow::Context;
use clap::{Parser, Subcommand};
use md_harvest::config::{load_config_or_default, validate, Config};
use md_harvest::crawler::crawl;
use md_harvest::output::{print_crawl_summary, print_split_summary};
use md_harvest::split::split_directory;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// md-harvest: web pages to markdown, markdown to RAG chunks
///
/// `crawl` fetches a site breadth-first and writes the main content of each
/// page as a markdown file. `split` cuts markdown files into one file per
/// heading section, ready for retrieval indexing.
#[derive(Parser, Debug)]
#[command(name = "md-harvest")]
#[command(version)]
#[command(about = "Crawl web pages into markdown and split markdown into chunks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from a start URL and write one markdown file per page
    Crawl {
        /// URL to start crawling from
        url: String,

        /// Maximum link depth to follow (0 = only the start page)
        #[arg(long, value_name = "N")]
        depth: Option<u32>,

        /// Directory for page files [default: web_content]
        #[arg(long, value_name = "DIR")]
        output: Option<String>,

        /// Follow links to other hosts
        #[arg(long)]
        allow_external: bool,

        /// Per-request timeout in seconds [default: 30]
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Split markdown files into one file per heading section
    Split {
        /// Directory containing markdown files
        input_dir: PathBuf,

        /// Directory for chunk files [default: chunks]
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<String>,

        /// Deepest heading level (1-6) that starts a new chunk [default: 6]
        #[arg(short = 'l', long, value_name = "N")]
        max_level: Option<u8>,

        /// Also process markdown files in subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            depth,
            output,
            allow_external,
            timeout,
        } => {
            let mut config = config;
            if let Some(depth) = depth {
                config.crawl.max_depth = depth;
            }
            if let Some(output) = output {
                config.crawl.output_dir = output;
            }
            if allow_external {
                config.crawl.allow_external = true;
            }
            if let Some(timeout) = timeout {
                config.crawl.timeout_secs = timeout;
            }
            validate(&config).context("Invalid settings")?;

            handle_crawl(&url, &config, cli.quiet).await
        }

        Command::Split {
            input_dir,
            output_dir,
            max_level,
            recursive,
        } => {
            let mut config = config;
            if let Some(output_dir) = output_dir {
                config.split.output_dir = output_dir;
            }
            if let Some(max_level) = max_level {
                config.split.max_level = max_level;
            }
            if recursive {
                config.split.recursive = true;
            }
            validate(&config).context("Invalid settings")?;

            handle_split(&input_dir, &config, cli.quiet)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("md_harvest=info,warn"),
            1 => EnvFilter::new("md_harvest=debug,info"),
            2 => EnvFilter::new("md_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or defaults when none was given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    match load_config_or_default(path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the crawl subcommand
async fn handle_crawl(url: &str, config: &Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} into {} (max depth {})",
        url,
        config.crawl.output_dir,
        config.crawl.max_depth
    );

    match crawl(url, config).await {
        Ok(stats) => {
            if !quiet {
                print_crawl_summary(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the split subcommand
fn handle_split(input_dir: &Path, config: &Config, quiet: bool) -> anyhow::Result<()> {
    match split_directory(input_dir, &config.split) {
        Ok(stats) => {
            if !quiet {
                print_split_summary(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Split failed: {}", e);
            Err(e.into())
        }
    }
}
