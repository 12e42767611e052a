use serde::Deserialize;

/// Main configuration structure for md-harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub extract: ExtractConfig,
    pub url: UrlConfig,
    pub split: SplitConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum number of link hops from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Directory that receives one markdown file per page
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Follow links to hosts other than the start URL's host
    #[serde(rename = "allow-external")]
    pub allow_external: bool,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// URLs whose path contains one of these are never crawled
    #[serde(rename = "skip-path-keywords")]
    pub skip_path_keywords: Vec<String>,

    /// URLs whose path ends with one of these are never crawled
    #[serde(rename = "skip-extensions")]
    pub skip_extensions: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            output_dir: "web_content".to_string(),
            allow_external: false,
            user_agent: format!("md-harvest/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            skip_path_keywords: to_strings(&["login", "logout", "signup", "register"]),
            skip_extensions: to_strings(&[
                ".zip", ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
            ]),
        }
    }
}

/// Content extraction heuristics
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Elements with these tag names are dropped with their subtree
    #[serde(rename = "noise-tags")]
    pub noise_tags: Vec<String>,

    /// Elements whose class or id tokens match one of these are dropped
    #[serde(rename = "noise-keywords")]
    pub noise_keywords: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            noise_tags: to_strings(&[
                "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
                "iframe", "form", "svg", "button",
            ]),
            noise_keywords: to_strings(&[
                "nav",
                "menu",
                "footer",
                "header",
                "sidebar",
                "ad",
                "ads",
                "advert",
                "banner",
                "sponsor",
                "cookie",
                "popup",
                "breadcrumb",
                "share",
                "social",
            ]),
        }
    }
}

/// URL normalization configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Query parameters removed during normalization (any `utm_*` is always removed)
    #[serde(rename = "tracking-params")]
    pub tracking_params: Vec<String>,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            tracking_params: crate::url::DEFAULT_TRACKING_PARAMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Markdown splitting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Deepest heading level that still starts a new chunk (1-6)
    #[serde(rename = "max-level")]
    pub max_level: u8,

    /// Directory that receives the chunk files
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Search subdirectories of the input directory
    pub recursive: bool,

    /// Write a `Source:` line at the top of every chunk file
    #[serde(rename = "include-source")]
    pub include_source: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_level: 6,
            output_dir: "chunks".to_string(),
            recursive: false,
            include_source: true,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
