//! Page and chunk file writers

use crate::crawler::Page;
use crate::output::naming::{chunk_file_stem, page_file_stem, FileNamer};
use crate::split::Chunk;
use crate::HarvestError;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates the output directory if needed and checks that it is writable
///
/// Called before any page is fetched or any chunk emitted, so an unusable
/// directory fails the run up front.
pub fn ensure_output_dir(dir: &Path) -> Result<(), HarvestError> {
    let to_error = |source: io::Error| HarvestError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(to_error)?;

    let metadata = fs::metadata(dir).map_err(to_error)?;
    if !metadata.is_dir() {
        return Err(to_error(io::Error::new(
            io::ErrorKind::Other,
            "not a directory",
        )));
    }
    check_writable(dir).map_err(to_error)
}

/// Creates and removes a scratch file in `dir`
///
/// Permission bits miss ownership, ACLs and read-only mounts.
fn check_writable(dir: &Path) -> io::Result<()> {
    static PROBES: AtomicUsize = AtomicUsize::new(0);

    let name = format!(
        ".md-harvest-{}-{}.tmp",
        std::process::id(),
        PROBES.fetch_add(1, Ordering::Relaxed)
    );
    let path = dir.join(name);

    OpenOptions::new().write(true).create_new(true).open(&path)?;
    fs::remove_file(&path)
}

/// Writes `content` to `dir/{stem}.md`, warning when an older file is replaced
fn write_markdown(dir: &Path, stem: &str, content: &str) -> io::Result<PathBuf> {
    let path = dir.join(format!("{}.md", stem));
    if path.exists() {
        tracing::warn!("Overwriting {} from a previous run", path.display());
    }
    fs::write(&path, content)?;
    Ok(path)
}

/// Writes one markdown file per crawled page
#[derive(Debug)]
pub struct PageWriter {
    dir: PathBuf,
    namer: FileNamer,
}

impl PageWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            namer: FileNamer::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a page as `# {title}`, a `Source:` line and the body
    pub fn write(&mut self, page: &Page) -> io::Result<PathBuf> {
        let stem = self.namer.claim(&page_file_stem(&page.url));
        write_markdown(&self.dir, &stem, &format_page(page))
    }
}

/// Renders the file content for a page
pub fn format_page(page: &Page) -> String {
    let mut out = format!("# {}\n\nSource: {}\n", page.title, page.url);
    if !page.markdown_body.is_empty() {
        out.push('\n');
        out.push_str(&page.markdown_body);
        out.push('\n');
    }
    out
}

/// Writes one markdown file per emitted chunk
///
/// Names are unique across everything written through the same writer, so
/// chunks of different source files never overwrite each other.
#[derive(Debug)]
pub struct ChunkWriter {
    dir: PathBuf,
    namer: FileNamer,
    include_source: bool,
}

impl ChunkWriter {
    pub fn new(dir: impl Into<PathBuf>, include_source: bool) -> Self {
        Self {
            dir: dir.into(),
            namer: FileNamer::new(),
            include_source,
        }
    }

    pub fn write(&mut self, source_stem: &str, chunk: &Chunk) -> io::Result<PathBuf> {
        let stem = self
            .namer
            .claim(&chunk_file_stem(source_stem, &chunk.heading_path));
        let content = format_chunk(source_stem, chunk, self.include_source);
        write_markdown(&self.dir, &stem, &content)
    }
}

/// Renders the file content for a chunk
///
/// `Source: {stem}`, the chunk's heading line and its content, separated by
/// blank lines; absent parts are skipped.
pub fn format_chunk(source_stem: &str, chunk: &Chunk, include_source: bool) -> String {
    let mut parts = Vec::with_capacity(3);
    if include_source {
        parts.push(format!("Source: {}", source_stem));
    }
    if let Some(heading) = chunk.heading_line() {
        parts.push(heading);
    }
    if !chunk.content.is_empty() {
        parts.push(chunk.content.clone());
    }

    let mut out = parts.join("\n\n");
    out.push('\n');
    out
}
