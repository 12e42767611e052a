//! Chunk emission
//!
//! Walks a heading tree and yields one chunk per section boundary at or
//! above the configured maximum heading level.

use crate::split::segment::{format_heading, HeadingNode};

/// One emitted unit of text bounded by a heading at or above the max level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Titles from the first real heading down to this chunk's heading
    pub heading_path: Vec<String>,

    /// Heading level of the chunk (0 for content before the first heading)
    pub level: u8,

    /// Body text, with deeper sections inlined as markdown
    pub content: String,
}

impl Chunk {
    /// The chunk's own heading title, if it has one
    pub fn title(&self) -> Option<&str> {
        self.heading_path.last().map(|s| s.as_str())
    }

    /// The markdown heading line for the chunk (`## Title`)
    pub fn heading_line(&self) -> Option<String> {
        self.title()
            .filter(|_| self.level > 0)
            .map(|t| format_heading(self.level, t))
    }
}

/// Lazy pre-order iterator over the chunks of a heading tree
///
/// Single pass: once exhausted, call [`emit`] again to walk the tree anew.
pub struct Chunks<'a> {
    max_level: u8,
    stack: Vec<(&'a HeadingNode, Vec<String>)>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        while let Some((node, path)) = self.stack.pop() {
            let mut lines: Vec<String> = node.body_lines.clone();
            let mut boundaries = Vec::new();

            for child in &node.children {
                if child.level > self.max_level {
                    child.render_into(&mut lines);
                } else {
                    let mut child_path = path.clone();
                    child_path.push(child.title.clone());
                    boundaries.push((child, child_path));
                }
            }

            // Reverse so the first child is popped first (document order)
            self.stack.extend(boundaries.into_iter().rev());

            let content = trim_blank_lines(&lines);

            // A root without text is not a chunk; a heading always is
            if node.is_root() && content.is_empty() {
                continue;
            }

            return Some(Chunk {
                heading_path: path,
                level: node.level,
                content,
            });
        }

        None
    }
}

/// Emits the chunks of a heading tree in document order
///
/// A node at level <= `max_level` (or the root) starts a chunk whose
/// content is its body plus the fully rendered subtrees of children deeper
/// than `max_level`. Children at level <= `max_level` start chunks of their
/// own. `max_level` must be 1-6; see [`crate::config::validate_max_level`].
///
/// # Example
///
/// ```
/// use md_harvest::split::{emit, segment};
///
/// let tree = segment("# A\n\ntext\n## B\n\nmore\n### C\n\ndeep");
/// let chunks: Vec<_> = emit(&tree, 2).collect();
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[1].heading_path, vec!["A", "B"]);
/// assert_eq!(chunks[1].content, "more\n### C\n\ndeep");
/// ```
pub fn emit(root: &HeadingNode, max_level: u8) -> Chunks<'_> {
    Chunks {
        max_level,
        stack: vec![(root, Vec::new())],
    }
}

/// Joins lines, dropping leading and trailing blank lines
fn trim_blank_lines(lines: &[String]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());

    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
