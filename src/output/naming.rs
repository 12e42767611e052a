//! Output file naming
//!
//! Page files are named after their URL, chunk files after their source
//! file and heading path. Names are kept filesystem-safe and short, and
//! [`FileNamer`] makes them unique within a run.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use url::Url;

/// Names longer than this are shortened
const MAX_NAME_LEN: usize = 100;

/// Characters kept from a long name before the hash suffix
const SHORT_PREFIX_LEN: usize = 50;

/// Hex digits of the hash appended to shortened names
const HASH_LEN: usize = 10;

/// Derives the file stem (no extension) for a crawled page
///
/// Host (with port, without `www.`) and path (without surrounding slashes
/// and without the last segment's extension) are joined by `_`. Characters
/// that are unsafe in filenames become `_`, dots and spaces become `-`.
///
/// # Example
///
/// ```
/// use md_harvest::output::page_file_stem;
/// use url::Url;
///
/// let url = Url::parse("https://www.example.com/docs/intro.html").unwrap();
/// assert_eq!(page_file_stem(&url), "example-com_docs_intro");
/// ```
pub fn page_file_stem(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let mut netloc = host.strip_prefix("www.").unwrap_or(host).to_string();
    if let Some(port) = url.port() {
        netloc.push_str(&format!(":{}", port));
    }

    let path = strip_extension(url.path().trim_matches('/'));
    let base = if path.is_empty() {
        netloc
    } else {
        format!("{}_{}", netloc, path)
    };

    let safe: String = base
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            '.' | ' ' => '-',
            c => c,
        })
        .collect();

    shorten(safe, url.as_str())
}

/// Derives the file stem for a chunk of `source_stem`
///
/// The root chunk keeps the source stem; other chunks append the slug of
/// every title on their heading path.
pub fn chunk_file_stem(source_stem: &str, heading_path: &[String]) -> String {
    if heading_path.is_empty() {
        return source_stem.to_string();
    }

    let mut name = source_stem.to_string();
    for title in heading_path {
        name.push('_');
        name.push_str(&slugify(title));
    }

    let key = name.clone();
    shorten(name, &key)
}

/// Turns a heading title into a filename-safe slug
///
/// Keeps word characters, whitespace and `-`; lowercases; collapses runs of
/// `-` and whitespace into a single `-`. An empty result becomes `section`.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_lowercase();

    let mut slug = String::with_capacity(kept.len());
    let mut in_run = false;
    for c in kept.chars() {
        if c == '-' || c.is_whitespace() {
            if !in_run {
                slug.push('-');
            }
            in_run = true;
        } else {
            slug.push(c);
            in_run = false;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Strips the extension of the last path segment (`docs/a.html` -> `docs/a`)
fn strip_extension(path: &str) -> &str {
    let segment_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[segment_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..segment_start + dot],
        _ => path,
    }
}

/// Shortens names over the length limit to a prefix plus a hash of `key`
fn shorten(name: String, key: &str) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        return name;
    }

    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    let prefix: String = name.chars().take(SHORT_PREFIX_LEN).collect();
    format!("{}_{}", prefix, &digest[..HASH_LEN])
}

/// Hands out unique file stems within one run
///
/// The first claim of a stem gets it unchanged; later claims get `_2`,
/// `_3`, ... in claim order.
#[derive(Debug, Default)]
pub struct FileNamer {
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `stem` or the first free suffixed variant, and reserves it
    pub fn claim(&mut self, stem: &str) -> String {
        if self.used.insert(stem.to_string()) {
            return stem.to_string();
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", stem, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
