//! Heading segmentation
//!
//! Parses a markdown document into a tree of heading-delimited sections.

use crate::split::fence::FenceState;

/// One heading-delimited section of a markdown document
///
/// The tree is rooted at an implicit level-0 node holding any content that
/// precedes the first heading. Every child has a strictly greater level than
/// its parent; children keep document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingNode {
    /// 0 for the implicit root, 1-6 for real headings
    pub level: u8,

    /// Heading text without the `#` markers (empty for the root)
    pub title: String,

    /// Lines between this heading and its first child (or the next closing heading)
    pub body_lines: Vec<String>,

    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Creates the implicit root node
    pub fn root() -> Self {
        Self::new(0, String::new())
    }

    pub fn new(level: u8, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body_lines: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns true for the implicit level-0 root
    pub fn is_root(&self) -> bool {
        self.level == 0
    }

    /// The markdown heading line (`## Title`); None for the root
    pub fn heading_line(&self) -> Option<String> {
        if self.is_root() {
            None
        } else {
            Some(format_heading(self.level, &self.title))
        }
    }

    /// Renders this node and its whole subtree back to markdown
    ///
    /// Heading line (omitted for the root), body lines, then children
    /// depth-first, joined by newlines.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_into(&mut lines);
        lines.join("\n")
    }

    pub(crate) fn render_into(&self, lines: &mut Vec<String>) {
        if let Some(heading) = self.heading_line() {
            lines.push(heading);
        }
        lines.extend(self.body_lines.iter().cloned());
        for child in &self.children {
            child.render_into(lines);
        }
    }

    /// Total number of nodes in the subtree, root included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

/// Formats a heading line that parses back to exactly `title`
///
/// A title that would lose trailing `#` characters (`a #`) gets a closing
/// sequence: `## a # #`.
pub(crate) fn format_heading(level: u8, title: &str) -> String {
    let line = format!("{} {}", "#".repeat(level as usize), title);
    match parse_heading(&line) {
        Some((_, parsed)) if parsed == title => line,
        _ => format!("{} #", line),
    }
}

/// Parses a heading line (`^#{1,6}\s+.+`) into its level and title
///
/// A closing sequence of `#` preceded by whitespace is stripped from the
/// title, so `## Setup ##` gives `Setup` while `## C#` keeps `C#`.
pub fn parse_heading(line: &str) -> Option<(u8, String)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let mut title = rest.trim();
    let without_closing = title.trim_end_matches('#');
    if without_closing.len() < title.len() && without_closing.ends_with([' ', '\t']) {
        title = without_closing.trim_end();
    }

    if title.is_empty() {
        return None;
    }

    Some((hashes as u8, title.to_string()))
}

/// Segments a markdown document into a heading tree
///
/// A heading of level L closes every open section of level >= L and becomes
/// a child of the nearest open section of lower level (or the root).
/// Heading-like lines inside fenced code blocks are body text.
///
/// # Example
///
/// ```
/// use md_harvest::split::segment;
///
/// let root = segment("intro\n# A\ntext\n## B\nmore");
/// assert_eq!(root.body_lines, vec!["intro"]);
/// assert_eq!(root.children[0].title, "A");
/// assert_eq!(root.children[0].children[0].title, "B");
/// ```
pub fn segment(markdown: &str) -> HeadingNode {
    let mut stack: Vec<HeadingNode> = vec![HeadingNode::root()];
    let mut fence = FenceState::default();

    for line in markdown.lines() {
        let in_fence = fence.is_open();
        let is_delimiter = fence.update(line);

        if !in_fence && !is_delimiter {
            if let Some((level, title)) = parse_heading(line) {
                close_until(&mut stack, level);
                stack.push(HeadingNode::new(level, title));
                continue;
            }
        }

        if let Some(current) = stack.last_mut() {
            current.body_lines.push(line.to_string());
        }
    }

    close_until(&mut stack, 1);
    stack.pop().unwrap_or_else(HeadingNode::root)
}

/// Pops every open section with level >= `level` into its parent
fn close_until(stack: &mut Vec<HeadingNode>, level: u8) {
    while stack.len() > 1 && stack.last().map(|n| n.level >= level).unwrap_or(false) {
        if let Some(node) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
    }
}
