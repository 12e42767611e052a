//! Boilerplate detection
//!
//! Elements are classified as noise (navigation, headers, footers, sidebars,
//! scripts, advertising) by a set of independent predicates. This is a
//! best-effort heuristic: some boilerplate will survive and, on unusual
//! markup, some real content can be dropped.

use crate::config::ExtractConfig;
use scraper::ElementRef;
use std::collections::HashSet;

/// A single noise heuristic
pub trait NoisePredicate: Send + Sync {
    /// Returns true if the element and its subtree should be dropped
    fn is_noise(&self, element: &ElementRef<'_>) -> bool;
}

/// Matches elements by tag name (`nav`, `script`, ...)
#[derive(Debug, Clone)]
pub struct TagPredicate {
    tags: HashSet<String>,
}

impl TagPredicate {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }
}

impl NoisePredicate for TagPredicate {
    fn is_noise(&self, element: &ElementRef<'_>) -> bool {
        self.tags.contains(element.value().name())
    }
}

/// Matches elements whose `class` or `id` contains a noise keyword
///
/// Attribute values are split into lowercase alphanumeric tokens
/// (`main-nav__item` becomes `main`, `nav`, `item`). A token matches a keyword
/// when it is equal to it, or when it starts with it and the keyword is at
/// least three characters long, so `nav` matches `navbar` while `ad` only
/// matches the token `ad` and never `header` or `download`.
#[derive(Debug, Clone)]
pub struct KeywordPredicate {
    keywords: Vec<String>,
}

impl KeywordPredicate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn token_matches(&self, token: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| token == k || (k.len() >= 3 && token.starts_with(k.as_str())))
    }
}

impl NoisePredicate for KeywordPredicate {
    fn is_noise(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();

        el.classes()
            .chain(el.id())
            .flat_map(|value| value.split(|c: char| !c.is_alphanumeric()))
            .filter(|token| !token.is_empty())
            .any(|token| self.token_matches(&token.to_lowercase()))
    }
}

/// Matches ARIA landmark roles that mark page chrome rather than content
#[derive(Debug, Clone, Default)]
pub struct RolePredicate;

const CHROME_ROLES: &[&str] = &[
    "navigation",
    "banner",
    "contentinfo",
    "complementary",
    "search",
];

impl NoisePredicate for RolePredicate {
    fn is_noise(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();

        if el.attr("hidden").is_some() || el.attr("aria-hidden") == Some("true") {
            return true;
        }

        el.attr("role")
            .map(|role| CHROME_ROLES.contains(&role.trim().to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// The pluggable set of noise predicates used by the extractor
///
/// An element is noise when any predicate says so.
pub struct NoiseFilter {
    predicates: Vec<Box<dyn NoisePredicate>>,
}

impl NoiseFilter {
    /// Creates a filter with no predicates (keeps everything)
    pub fn empty() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Builds the standard predicate set from configuration
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self::empty()
            .with(TagPredicate::new(&config.noise_tags))
            .with(KeywordPredicate::new(&config.noise_keywords))
            .with(RolePredicate)
    }

    /// Adds a predicate to the set
    pub fn with<P: NoisePredicate + 'static>(mut self, predicate: P) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Returns true if any predicate classifies the element as noise
    pub fn is_noise(&self, element: &ElementRef<'_>) -> bool {
        self.predicates.iter().any(|p| p.is_noise(element))
    }

    /// Number of predicates in the set
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::from_config(&ExtractConfig::default())
    }
}

impl std::fmt::Debug for NoiseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseFilter")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}
