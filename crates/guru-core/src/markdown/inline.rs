//! Inline emphasis
//!
//! A single left-to-right pass over `**strong**` and `*emphasis*` runs.
//! Runs never nest and never span another asterisk.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// One inline run of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Strong(s) | Inline::Emphasis(s) => s,
        }
    }
}

fn emphasis_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\*\*[^*]+\*\*|\*[^*]+\*").expect("emphasis pattern is valid")
    })
}

/// Split text into plain and emphasised runs
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut parts = Vec::new();
    let mut cursor = 0;

    for m in emphasis_pattern().find_iter(text) {
        if m.start() > cursor {
            parts.push(Inline::Text(text[cursor..m.start()].to_string()));
        }

        let run = m.as_str();
        if run.starts_with("**") && run.ends_with("**") && run.len() >= 4 {
            parts.push(Inline::Strong(run[2..run.len() - 2].to_string()));
        } else {
            parts.push(Inline::Emphasis(run[1..run.len() - 1].to_string()));
        }
        cursor = m.end();
    }

    if cursor < text.len() {
        parts.push(Inline::Text(text[cursor..].to_string()));
    }
    parts
}

/// Drop every emphasis marker, for plain-text display
pub fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

/// Concatenated text of a run sequence without markers
pub fn plain_text(parts: &[Inline]) -> String {
    parts.iter().map(Inline::text).collect()
}
