use regex::Regex;
use std::sync::LazyLock;

static HEADER_MISSING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})(\p{L})").expect("header pattern is valid"));
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[*•+]\s+(\S)").expect("bullet pattern is valid"));
static ORDERED_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d{1,3})\)\s+(\S)").expect("ordered pattern is valid"));
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6} ").expect("header pattern is valid"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:- |\d{1,3}\. )").expect("list pattern is valid"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Header,
    ListItem,
    Paragraph,
}

fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if HEADER.is_match(line) {
        LineKind::Header
    } else if LIST_ITEM.is_match(line) {
        LineKind::ListItem
    } else {
        LineKind::Paragraph
    }
}

fn normalize_line(line: &str) -> String {
    let line = HEADER_MISSING_SPACE.replace(line, "$1 $2");
    let line = BULLET_MARKER.replace(&line, "$1- $2");
    ORDERED_PAREN.replace(&line, "$1$2. $3").into_owned()
}

/// Normalizes markdown emitted by the model so the chat widget renders it
/// consistently. Applying it to its own output is a no-op.
///
/// Fenced code blocks are passed through untouched.
pub fn format_response(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous = LineKind::Blank;
    let mut in_code_block = false;

    for raw in text.lines() {
        let raw = raw.trim_end();

        if raw.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            lines.push(raw.to_string());
            previous = LineKind::Paragraph;
            continue;
        }
        if in_code_block {
            lines.push(raw.to_string());
            continue;
        }

        let line = normalize_line(raw);
        let kind = classify(&line);

        match kind {
            LineKind::Blank => {
                if previous != LineKind::Blank {
                    lines.push(String::new());
                }
            }
            LineKind::Header => {
                if !lines.is_empty() && previous != LineKind::Blank {
                    lines.push(String::new());
                }
                lines.push(line);
            }
            LineKind::ListItem => {
                if previous == LineKind::Paragraph {
                    lines.push(String::new());
                }
                lines.push(line);
            }
            LineKind::Paragraph => lines.push(line),
        }
        previous = kind;
    }

    lines.join("\n").trim().to_string()
}
