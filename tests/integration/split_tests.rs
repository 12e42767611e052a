//! Integration tests for the markdown splitter
//!
//! These tests run `split_directory` over temporary directories and check
//! the chunk files it writes.

use md_harvest::config::SplitConfig;
use md_harvest::split::{emit, segment, split_directory};
use md_harvest::{ConfigError, HarvestError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn split_config(output_dir: &Path, max_level: u8) -> SplitConfig {
    SplitConfig {
        max_level,
        output_dir: output_dir.to_string_lossy().into_owned(),
        ..SplitConfig::default()
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_split_inlines_deeper_sections() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        input.path().join("guide.md"),
        "# A\n\ntext\n## B\n\nmore\n### C\n\ndeep\n",
    )
    .unwrap();

    let stats = split_directory(input.path(), &split_config(output.path(), 2)).unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.chunks_written(), 2);
    assert_eq!(
        file_names(output.path()),
        vec!["guide_a.md", "guide_a_b.md"]
    );
    assert_eq!(read(output.path(), "guide_a.md"), "Source: guide\n\n# A\n\ntext\n");
    assert_eq!(
        read(output.path(), "guide_a_b.md"),
        "Source: guide\n\n## B\n\nmore\n### C\n\ndeep\n"
    );
}

#[test]
fn test_preface_becomes_root_chunk() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("notes.md"), "Intro line.\n\n# First\nbody\n").unwrap();

    split_directory(input.path(), &split_config(output.path(), 6)).unwrap();

    assert_eq!(file_names(output.path()), vec!["notes.md", "notes_first.md"]);
    assert_eq!(read(output.path(), "notes.md"), "Source: notes\n\nIntro line.\n");
}

#[test]
fn test_colliding_chunk_names_get_suffixes() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        input.path().join("faq.md"),
        "# Question\none\n# Question\ntwo\n# Question?\nthree\n",
    )
    .unwrap();

    let stats = split_directory(input.path(), &split_config(output.path(), 1)).unwrap();

    assert_eq!(stats.chunks_written(), 3);
    assert_eq!(
        file_names(output.path()),
        vec!["faq_question.md", "faq_question_2.md", "faq_question_3.md"]
    );
    assert!(read(output.path(), "faq_question_2.md").ends_with("two\n"));
    assert!(read(output.path(), "faq_question_3.md").contains("# Question?"));
}

#[test]
fn test_fenced_headings_stay_in_chunk() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(
        input.path().join("code.md"),
        "# Usage\n```sh\n# not a heading\nrun\n```\n",
    )
    .unwrap();

    split_directory(input.path(), &split_config(output.path(), 6)).unwrap();

    assert_eq!(file_names(output.path()), vec!["code_usage.md"]);
    assert_eq!(
        read(output.path(), "code_usage.md"),
        "Source: code\n\n# Usage\n\n```sh\n# not a heading\nrun\n```\n"
    );
}

#[test]
fn test_recursive_mode() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::create_dir(input.path().join("nested")).unwrap();
    fs::write(input.path().join("top.md"), "# Top\n").unwrap();
    fs::write(input.path().join("nested").join("deep.md"), "# Deep\n").unwrap();
    fs::write(input.path().join("nested").join("skip.txt"), "# Not markdown\n").unwrap();

    let flat = split_directory(input.path(), &split_config(output.path(), 6)).unwrap();
    assert_eq!(flat.files_processed, 1);

    let recursive_out = TempDir::new().unwrap();
    let mut config = split_config(recursive_out.path(), 6);
    config.recursive = true;
    let deep = split_directory(input.path(), &config).unwrap();

    assert_eq!(deep.files_processed, 2);
    assert_eq!(
        file_names(recursive_out.path()),
        vec!["deep_deep.md", "top_top.md"]
    );
}

#[test]
fn test_without_source_line() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("doc.md"), "# Title\nbody\n").unwrap();

    let mut config = split_config(output.path(), 6);
    config.include_source = false;
    split_directory(input.path(), &config).unwrap();

    assert_eq!(read(output.path(), "doc_title.md"), "# Title\n\nbody\n");
}

#[test]
fn test_missing_input_dir() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("out");

    let result = split_directory(&tmp.path().join("missing"), &split_config(&output, 6));

    assert!(matches!(result, Err(HarvestError::InputDir { .. })));
    assert!(!output.exists());
}

#[test]
fn test_invalid_max_level() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    for level in [0, 7] {
        let result = split_directory(input.path(), &split_config(output.path(), level));
        assert!(matches!(
            result,
            Err(HarvestError::Config(ConfigError::Validation(_)))
        ));
    }
}

#[test]
fn test_segment_render_round_trip() {
    let source = "preface\n# One\ntext\n## Two\n```\n# fenced\n```\n### Three\n# Four";
    let tree = segment(source);
    let rendered = tree.render();

    assert_eq!(segment(&rendered), tree);
    assert_eq!(emit(&tree, 2).count(), emit(&segment(&rendered), 2).count());
}
