//! HTML to markdown rendering
//!
//! Walks the content subtree chosen by the extractor and maps semantic HTML
//! to markdown. Block elements become blank-line separated blocks; inline
//! elements are flattened into the surrounding text.

use crate::extract::noise::NoiseFilter;
use crate::split::fence::FenceState;
use crate::url::{absolutize_href, UrlNormalizer};
use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

/// Indentation added per nested list level
const LIST_INDENT: &str = "    ";

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "ul",
];

fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

fn contains_list(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|e| matches!(e.value().name(), "ul" | "ol"))
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Renders one page's content subtree to markdown
pub(crate) struct MarkdownRenderer<'a> {
    base_url: &'a Url,
    normalizer: &'a UrlNormalizer,
    noise: &'a NoiseFilter,
}

impl<'a> MarkdownRenderer<'a> {
    pub(crate) fn new(
        base_url: &'a Url,
        normalizer: &'a UrlNormalizer,
        noise: &'a NoiseFilter,
    ) -> Self {
        Self {
            base_url,
            normalizer,
            noise,
        }
    }

    /// Renders the subtree under `root` (the root itself is never noise-filtered)
    pub(crate) fn render(&self, root: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.render_container(root, &mut out);
        tidy(&out)
    }

    /// Renders a mix of inline and block children, grouping inline runs into paragraphs
    fn render_container(&self, element: ElementRef<'_>, out: &mut String) {
        let mut inline = String::new();

        for child in element.children() {
            match child.value() {
                Node::Text(text) => inline.push_str(&collapse_whitespace(text)),
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.noise.is_noise(&child_el) {
                        continue;
                    }
                    if is_block(child_el.value().name()) {
                        flush_paragraph(&mut inline, out);
                        self.render_block(child_el, out);
                    } else {
                        inline.push_str(&self.render_inline(child_el));
                    }
                }
                _ => {}
            }
        }

        flush_paragraph(&mut inline, out);
    }

    fn render_block(&self, element: ElementRef<'_>, out: &mut String) {
        let tag = element.value().name();

        if let Some(level) = heading_level(tag) {
            let text = squash(&self.inline_children(element));
            if !text.is_empty() {
                push_block(out, &format!("{} {}", "#".repeat(level), text));
            }
            return;
        }

        match tag {
            "p" => {
                let mut text = self.inline_children(element);
                flush_paragraph(&mut text, out);
            }
            "ul" | "ol" => {
                let mut lines = String::new();
                self.render_list(element, 0, &mut lines);
                push_block(out, lines.trim_end());
            }
            "pre" => push_block(out, &render_code_block(element)),
            "blockquote" => {
                let mut inner = String::new();
                self.render_container(element, &mut inner);
                let inner = tidy(&inner);
                if !inner.is_empty() {
                    let quoted = inner
                        .lines()
                        .map(|line| {
                            if line.is_empty() {
                                ">".to_string()
                            } else {
                                format!("> {}", line)
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    push_block(out, &quoted);
                }
            }
            "hr" => push_block(out, "---"),
            "table" => {
                let table = self.render_table(element);
                if !table.is_empty() {
                    push_block(out, &table);
                }
            }
            _ => self.render_container(element, out),
        }
    }

    fn render_inline(&self, element: ElementRef<'_>) -> String {
        let el = element.value();

        match el.name() {
            "a" => {
                let text = squash(&self.inline_children(element));
                match el.attr("href") {
                    Some(href) if !text.is_empty() => format!(
                        "[{}]({})",
                        text,
                        absolutize_href(href, self.base_url, self.normalizer)
                    ),
                    _ => text,
                }
            }
            "img" => {
                let Some(src) = el.attr("src").or_else(|| el.attr("data-src")) else {
                    return String::new();
                };
                let src = src.trim();
                let absolute = self
                    .base_url
                    .join(src)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| src.to_string());
                format!("![{}]({})", squash(el.attr("alt").unwrap_or("")), absolute)
            }
            "strong" | "b" => wrap_emphasis(&self.inline_children(element), "**"),
            "em" | "i" => wrap_emphasis(&self.inline_children(element), "*"),
            "code" | "kbd" | "samp" => {
                let code: String = element.text().collect();
                inline_code(&collapse_whitespace(&code))
            }
            "br" => "\n".to_string(),
            tag if is_block(tag) => format!(" {} ", self.inline_children(element)),
            _ => self.inline_children(element),
        }
    }

    fn inline_children(&self, element: ElementRef<'_>) -> String {
        let mut text = String::new();

        for child in element.children() {
            match child.value() {
                Node::Text(t) => text.push_str(&collapse_whitespace(t)),
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        if !self.noise.is_noise(&child_el) {
                            text.push_str(&self.render_inline(child_el));
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    /// Renders `ul`/`ol` items; nested lists are indented one level deeper
    fn render_list(&self, list: ElementRef<'_>, depth: usize, out: &mut String) {
        let ordered = list.value().name() == "ol";
        let mut number = list
            .value()
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);

        for child in list.children().filter_map(ElementRef::wrap) {
            if self.noise.is_noise(&child) {
                continue;
            }

            match child.value().name() {
                "li" => {
                    let mut text = String::new();
                    let mut nested = Vec::new();

                    self.collect_item(child, &mut text, &mut nested);

                    let marker = if ordered {
                        let marker = format!("{}.", number);
                        number += 1;
                        marker
                    } else {
                        "-".to_string()
                    };

                    let line = format!("{}{} {}", LIST_INDENT.repeat(depth), marker, squash(&text));
                    out.push_str(line.trim_end());
                    out.push('\n');

                    for nested_list in nested {
                        self.render_list(nested_list, depth + 1, out);
                    }
                }
                // Lists nested directly inside lists (invalid but common markup)
                "ul" | "ol" => self.render_list(child, depth + 1, out),
                _ => {}
            }
        }
    }

    /// Splits a list item into its own text and the lists nested in it
    ///
    /// Block wrappers that hold a list (`li > div > ul`) are descended into,
    /// so the list keeps its nesting instead of being flattened into text.
    fn collect_item<'e>(
        &self,
        item: ElementRef<'e>,
        text: &mut String,
        nested: &mut Vec<ElementRef<'e>>,
    ) {
        for child in item.children() {
            match child.value() {
                Node::Text(t) => text.push_str(&collapse_whitespace(t)),
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.noise.is_noise(&child_el) {
                        continue;
                    }
                    match child_el.value().name() {
                        "ul" | "ol" => nested.push(child_el),
                        tag if is_block(tag) && contains_list(child_el) => {
                            text.push(' ');
                            self.collect_item(child_el, text, nested);
                            text.push(' ');
                        }
                        _ => text.push_str(&self.render_inline(child_el)),
                    }
                }
                _ => {}
            }
        }
    }

    fn render_table(&self, table: ElementRef<'_>) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        self.collect_rows(table, &mut rows);

        let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (i, mut row) in rows.into_iter().enumerate() {
            row.resize(columns, String::new());
            lines.push(format!("| {} |", row.join(" | ")));
            if i == 0 {
                lines.push(format!("|{}", " --- |".repeat(columns)));
            }
        }

        lines.join("\n")
    }

    fn collect_rows(&self, element: ElementRef<'_>, rows: &mut Vec<Vec<String>>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "tr" => {
                    let cells = child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|c| matches!(c.value().name(), "td" | "th"))
                        .map(|c| squash(&self.inline_children(c)).replace('|', "\\|"))
                        .collect();
                    rows.push(cells);
                }
                "thead" | "tbody" | "tfoot" => self.collect_rows(child, rows),
                _ => {}
            }
        }
    }
}

/// Renders a `pre` element as a fenced code block with an optional language hint
fn render_code_block(pre: ElementRef<'_>) -> String {
    let code: String = pre.text().collect();
    let code = code.trim_end_matches(['\n', '\r']);

    let language = std::iter::once(pre)
        .chain(
            pre.children()
                .filter_map(ElementRef::wrap)
                .filter(|c| c.value().name() == "code"),
        )
        .flat_map(|el| el.value().classes())
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .unwrap_or("");

    let longest_run = longest_char_run(code, '`');
    let fence = "`".repeat(longest_run.max(2) + 1);

    format!("{fence}{language}\n{code}\n{fence}")
}

fn longest_char_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn inline_code(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return String::new();
    }
    if code.contains('`') {
        format!("`` {} ``", code)
    } else {
        format!("`{}`", code)
    }
}

/// Wraps text in an emphasis marker, keeping surrounding spaces outside the markers
fn wrap_emphasis(text: &str, marker: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }
    let lead = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if text.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{lead}{marker}{trimmed}{marker}{trail}")
}

/// Collapses whitespace runs to a single space, keeping a boundary space if present
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Single-line form: all whitespace (including line breaks) becomes one space
fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Emits accumulated inline text as a paragraph, one output line per `<br>`
fn flush_paragraph(inline: &mut String, out: &mut String) {
    let paragraph = inline
        .split('\n')
        .map(squash)
        .filter(|line| !line.is_empty())
        .map(|line| escape_line_start(&line))
        .collect::<Vec<_>>()
        .join("\n");

    if !paragraph.is_empty() {
        push_block(out, &paragraph);
    }
    inline.clear();
}

/// Keeps plain text from being read back as a heading or a code fence
fn escape_line_start(line: &str) -> String {
    if line.starts_with('#') || line.starts_with("```") || line.starts_with("~~~") {
        format!("\\{}", line)
    } else {
        line.to_string()
    }
}

/// Appends a block, separated from the previous one by a blank line
fn push_block(out: &mut String, block: &str) {
    if block.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push_str(if out.ends_with('\n') { "\n" } else { "\n\n" });
    }
    out.push_str(block);
    out.push('\n');
}

/// Whitespace policy: strip trailing spaces, collapse blank-line runs outside
/// fenced code, trim the whole document
pub(crate) fn tidy(markdown: &str) -> String {
    let mut fence = FenceState::default();
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in markdown.lines() {
        let was_open = fence.is_open();
        let delimiter = fence.update(line);

        if was_open && !delimiter {
            lines.push(line);
            previous_blank = false;
            continue;
        }

        let line = line.trim_end();
        if line.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
        }
        lines.push(line);
    }

    lines.join("\n").trim().to_string()
}
