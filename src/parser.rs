use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::block::{Block, Span};

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{3,}$").unwrap());

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,3}) (.+)$").unwrap());

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[✔•\-*]\s+(.+)$").unwrap());

// The `•\s+\w` alternative is a loose match for malformed generator output.
// Bullet classification runs first and already claims those lines, so it only
// documents the intended overlap. Whether such lines are sources is unresolved.
static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:[•\-]?\s*source.*:|•\s+\w)").unwrap());

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*$").unwrap());

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

/// Classification of a single trimmed source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Rule,
    Heading { level: u8, text: &'a str },
    Bullet(&'a str),
    Source(&'a str),
    Label(&'a str),
    Blank,
    Text(&'a str),
}

/// Classify a trimmed line. Rules are tried in priority order, first match wins.
pub(crate) fn classify(line: &str) -> Line<'_> {
    if RULE_RE.is_match(line) {
        return Line::Rule;
    }

    if let Some(caps) = HEADING_RE.captures(line) {
        if let (Some(hashes), Some(text)) = (caps.get(1), caps.get(2)) {
            // Both `##` and `###` are card titles
            let level = u8::try_from(hashes.len()).unwrap_or(3);
            return Line::Heading {
                level,
                text: text.as_str(),
            };
        }
    }

    if let Some(item) = BULLET_RE.captures(line).and_then(|caps| caps.get(1)) {
        return Line::Bullet(item.as_str());
    }

    if SOURCE_RE.is_match(line) {
        return Line::Source(line);
    }

    if let Some(label) = LABEL_RE.captures(line).and_then(|caps| caps.get(1)) {
        return Line::Label(label.as_str());
    }

    if line.is_empty() {
        return Line::Blank;
    }

    Line::Text(line)
}

/// Remove fenced code spans, delimiters included. An unmatched fence is kept.
fn strip_code_fences(text: &str) -> std::borrow::Cow<'_, str> {
    FENCE_RE.replace_all(text, "")
}

/// Split a line into text and bold spans. `**x**` pairs do not nest.
pub(crate) fn inline_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in BOLD_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::Text(text[last..whole.start()].to_string()));
        }
        spans.push(Span::Bold(inner.as_str().to_string()));
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }

    spans
}

/// Parse source text into a list of blocks
pub fn parse(text: &str) -> Vec<Block> {
    let text = strip_code_fences(text);
    let mut state = ParseState::default();
    let mut lines = 0usize;

    for line in text.lines() {
        process_line(classify(line.trim()), &mut state);
        lines += 1;
    }

    let blocks = state.finish();
    debug!(lines, blocks = blocks.len(), "parsed source text");
    blocks
}

#[derive(Default)]
struct ParseState {
    blocks: Vec<Block>,
    // Items of the bullet list currently open
    list: Option<Vec<Vec<Span>>>,
    // Plain lines waiting to be merged into one paragraph
    paragraph: Vec<Vec<Span>>,
}

impl ParseState {
    fn close_list(&mut self) {
        if let Some(items) = self.list.take() {
            self.blocks.push(Block::List { items });
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }

        let mut content: Vec<Span> = Vec::new();
        for (i, line) in std::mem::take(&mut self.paragraph).into_iter().enumerate() {
            if i > 0 {
                push_text(&mut content, " ");
            }
            for span in line {
                match span {
                    Span::Text(text) => push_text(&mut content, &text),
                    bold @ Span::Bold(_) => content.push(bold),
                }
            }
        }

        self.blocks.push(Block::Paragraph { content });
    }

    /// Close everything pending before a structural block or a break.
    fn flush(&mut self) {
        self.flush_paragraph();
        self.close_list();
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if let Some(Span::Text(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(Span::Text(text.to_string()));
    }
}

fn process_line(line: Line<'_>, state: &mut ParseState) {
    match line {
        // A rule only ends a list; text on both sides stays one paragraph
        Line::Rule => {
            state.close_list();
        }
        Line::Blank => {
            state.flush();
        }
        Line::Heading { level, text } => {
            state.flush();
            state.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        }
        Line::Bullet(item) => {
            state.flush_paragraph();
            state
                .list
                .get_or_insert_with(Vec::new)
                .push(inline_spans(item));
        }
        Line::Source(source) => {
            state.flush();
            state.blocks.push(Block::Source {
                content: inline_spans(source),
            });
        }
        Line::Label(label) => {
            state.flush();
            state.blocks.push(Block::Label {
                text: label.to_string(),
            });
        }
        Line::Text(text) => {
            state.close_list();
            state.paragraph.push(inline_spans(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Span {
        Span::Text(s.to_string())
    }

    fn bold(s: &str) -> Span {
        Span::Bold(s.to_string())
    }

    #[test]
    fn classify_priority() {
        assert_eq!(classify("---"), Line::Rule);
        assert_eq!(classify("-----"), Line::Rule);
        assert_eq!(
            classify("# Title"),
            Line::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            classify("### Title"),
            Line::Heading {
                level: 3,
                text: "Title"
            }
        );
        assert_eq!(classify("#NoSpace"), Line::Text("#NoSpace"));
        assert_eq!(classify("#### Deep"), Line::Text("#### Deep"));
        assert_eq!(classify("✔ done"), Line::Bullet("done"));
        assert_eq!(classify("*   spaced"), Line::Bullet("spaced"));
        assert_eq!(classify("**Overview**"), Line::Label("Overview"));
        assert_eq!(classify(""), Line::Blank);
    }

    #[test]
    fn classify_sources() {
        assert_eq!(classify("Source: Outlet"), Line::Source("Source: Outlet"));
        assert_eq!(classify("SOURCES: a, b"), Line::Source("SOURCES: a, b"));
        assert_eq!(classify("-Source: Outlet"), Line::Source("-Source: Outlet"));
        // Bullet classification wins over the source rule
        assert_eq!(classify("- Source: Outlet"), Line::Bullet("Source: Outlet"));
        assert_eq!(classify("• Word"), Line::Bullet("Word"));
        assert_eq!(classify("Source without colon"), Line::Text("Source without colon"));
    }

    #[test]
    fn bare_glyph_is_text() {
        assert_eq!(classify("-"), Line::Text("-"));
        assert_eq!(classify("#"), Line::Text("#"));
    }

    #[test]
    fn inline_without_pairs_is_unchanged() {
        assert_eq!(inline_spans("no pairs here"), vec![text("no pairs here")]);
        assert_eq!(inline_spans("a * b ** c"), vec![text("a * b ** c")]);
        assert!(inline_spans("").is_empty());
    }

    #[test]
    fn inline_bold_spans() {
        assert_eq!(
            inline_spans("**Latency**: improved by 20%"),
            vec![bold("Latency"), text(": improved by 20%")]
        );
        assert_eq!(
            inline_spans("a **b** c **d**"),
            vec![text("a "), bold("b"), text(" c "), bold("d")]
        );
    }

    #[test]
    fn fences_are_removed() {
        let blocks = parse("Before\n```rust\nlet x = 1;\n```\nAfter");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    content: vec![text("Before")]
                },
                Block::Paragraph {
                    content: vec![text("After")]
                },
            ]
        );
        assert_eq!(
            parse("Inline ```x``` fence"),
            vec![Block::Paragraph {
                content: vec![text("Inline  fence")]
            }]
        );
    }

    #[test]
    fn unmatched_fence_is_kept() {
        assert_eq!(
            parse("```\ncode"),
            vec![Block::Paragraph {
                content: vec![text("``` code")]
            }]
        );
    }

    #[test]
    fn paragraph_merge() {
        assert_eq!(
            parse("Line one.\nLine two.\n\nLine three."),
            vec![
                Block::Paragraph {
                    content: vec![text("Line one. Line two.")]
                },
                Block::Paragraph {
                    content: vec![text("Line three.")]
                },
            ]
        );
    }

    #[test]
    fn merge_keeps_bold_spans() {
        assert_eq!(
            parse("A **b**\nc"),
            vec![Block::Paragraph {
                content: vec![text("A "), bold("b"), text(" c")]
            }]
        );
    }

    #[test]
    fn list_closed_by_text_and_rule() {
        assert_eq!(
            parse("- one\n- two\nafter\n- three\n---\n- four"),
            vec![
                Block::List {
                    items: vec![vec![text("one")], vec![text("two")]]
                },
                Block::Paragraph {
                    content: vec![text("after")]
                },
                Block::List {
                    items: vec![vec![text("three")]]
                },
                Block::List {
                    items: vec![vec![text("four")]]
                },
            ]
        );
    }

    #[test]
    fn rule_does_not_split_paragraph() {
        assert_eq!(
            parse("Line one.\n---\nLine two."),
            vec![Block::Paragraph {
                content: vec![text("Line one. Line two.")]
            }]
        );
        assert_eq!(
            parse("**A**\ntext\n----\nmore"),
            vec![
                Block::Label {
                    text: "A".to_string()
                },
                Block::Paragraph {
                    content: vec![text("text more")]
                },
            ]
        );
    }

    #[test]
    fn text_before_list_is_flushed() {
        assert_eq!(
            parse("intro\n- item"),
            vec![
                Block::Paragraph {
                    content: vec![text("intro")]
                },
                Block::List {
                    items: vec![vec![text("item")]]
                },
            ]
        );
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(
            parse("   ## Padded  \r\n\t- item\t"),
            vec![
                Block::Heading {
                    level: 2,
                    text: "Padded".to_string()
                },
                Block::List {
                    items: vec![vec![text("item")]]
                },
            ]
        );
    }

    #[test]
    fn empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n---\n").is_empty());
    }
}
