//! Heading-aware markdown splitting
//!
//! A markdown document is segmented into a tree of heading sections
//! ([`segment`]), then walked to emit heading-bounded chunks ([`emit`]).
//! [`split_directory`] runs both over every markdown file in a directory
//! and writes one file per chunk.

mod emit;
pub(crate) mod fence;
mod segment;

pub use emit::{emit, Chunk, Chunks};
pub use segment::{parse_heading, segment, HeadingNode};

use crate::config::{validate_max_level, SplitConfig};
use crate::output::{ensure_output_dir, ChunkWriter, SplitStats};
use crate::{HarvestError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Splits every markdown file under `input_dir` into chunk files
///
/// Output goes to `config.output_dir` (created if absent). Files are
/// processed in path order; a file that cannot be read, or a chunk that
/// cannot be written, is logged and counted without stopping the run.
///
/// # Errors
///
/// Returns an error before anything is written if `input_dir` is not a
/// directory, `config.max_level` is outside 1-6, or the output directory
/// cannot be used.
pub fn split_directory(input_dir: &Path, config: &SplitConfig) -> Result<SplitStats> {
    if !input_dir.is_dir() {
        return Err(HarvestError::InputDir {
            path: input_dir.to_path_buf(),
        });
    }
    validate_max_level(config.max_level)?;

    let output_dir = Path::new(&config.output_dir);
    ensure_output_dir(output_dir)?;

    // Chunks from an earlier run must not be split again
    let skip_dir = fs::canonicalize(output_dir).ok();
    let files = find_markdown_files(input_dir, config.recursive, skip_dir.as_deref())?;
    tracing::info!(
        "Splitting {} markdown file(s) from {} at max level {}",
        files.len(),
        input_dir.display(),
        config.max_level
    );

    let mut stats = SplitStats::new();
    let mut writer = ChunkWriter::new(output_dir, config.include_source);

    for file in &files {
        let text = match fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", file.display(), e);
                stats.files_failed += 1;
                continue;
            }
        };

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let tree = segment(&text);
        let mut count = 0;
        for chunk in emit(&tree, config.max_level) {
            match writer.write(&stem, &chunk) {
                Ok(path) => {
                    tracing::debug!("Wrote {}", path.display());
                    stats.written.push(path);
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to write chunk of {}: {}", file.display(), e);
                    stats.write_failures += 1;
                }
            }
        }

        tracing::info!(
            "{}: {} section(s), {} chunk(s)",
            file.display(),
            tree.node_count() - 1,
            count
        );
        stats.files_processed += 1;
    }

    stats.finish();
    Ok(stats)
}

/// Lists `.md` files (case-insensitive) in `dir`, sorted by path
///
/// With `recursive`, subdirectories are searched too, except `skip_dir`
/// (compared as a canonical path).
pub fn find_markdown_files(
    dir: &Path,
    recursive: bool,
    skip_dir: Option<&Path>,
) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if recursive && !is_same_dir(&path, skip_dir) {
                    pending.push(path);
                }
            } else if is_markdown(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_same_dir(path: &Path, other: Option<&Path>) -> bool {
    match (other, fs::canonicalize(path)) {
        (Some(other), Ok(path)) => path == other,
        _ => false,
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_markdown_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join("a.MD"), "a").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("c.md"), "c").unwrap();

        let flat = find_markdown_files(tmp.path(), false, None).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MD", "b.md"]);

        let deep = find_markdown_files(tmp.path(), true, None).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.iter().any(|p| p.ends_with("sub/c.md")));

        let skip = fs::canonicalize(tmp.path().join("sub")).unwrap();
        let skipped = find_markdown_files(tmp.path(), true, Some(&skip)).unwrap();
        assert_eq!(skipped.len(), 2);
    }

    #[test]
    fn test_recursive_split_ignores_own_output() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.md"), "# One\na\n# Two\nb\n").unwrap();
        let config = SplitConfig {
            output_dir: tmp.path().join("chunks").to_string_lossy().into_owned(),
            recursive: true,
            ..SplitConfig::default()
        };

        let first = split_directory(tmp.path(), &config).unwrap();
        let second = split_directory(tmp.path(), &config).unwrap();

        assert_eq!(first.files_processed, 1);
        assert_eq!(second.files_processed, 1);
        assert_eq!(second.chunks_written(), 2);
        assert_eq!(fs::read_dir(tmp.path().join("chunks")).unwrap().count(), 2);
    }

    #[test]
    fn test_split_directory_rejects_bad_level() {
        let tmp = TempDir::new().unwrap();
        let config = SplitConfig {
            max_level: 7,
            output_dir: tmp.path().join("out").to_string_lossy().into_owned(),
            ..SplitConfig::default()
        };
        let result = split_directory(tmp.path(), &config);
        assert!(matches!(result, Err(HarvestError::Config(_))));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn test_split_directory_missing_input() {
        let tmp = TempDir::new().unwrap();
        let result = split_directory(&tmp.path().join("nope"), &SplitConfig::default());
        assert!(matches!(result, Err(HarvestError::InputDir { .. })));
    }
}
