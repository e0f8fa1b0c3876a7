//! Article body rendering
//!
//! Article bodies use a small markdown subset. Content is cut into chunks
//! at blank lines and each chunk is classified, in a fixed priority order,
//! into one [`Block`]:
//!
//! 1. `# ` document title (dropped; the title is already in the header)
//! 2. `![caption](src)` image, matched anywhere in the chunk
//! 3. `## ` heading
//! 4. `### ` sub-heading
//! 5. `> ` quote
//! 6. `- ` list (non-item lines in a mixed chunk are dropped)
//! 7. paragraph
//!
//! Later rules rely on earlier ones having already claimed their pattern.
//! Text inside headings, quotes, list items and paragraphs is parsed for
//! inline emphasis (see [`inline`]).

pub mod inline;
pub mod lead;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::models::Article;

pub use inline::{parse_inline, plain_text, strip_emphasis, Inline};
pub use lead::{extract_lead, LeadSplit};

/// A classified unit of rendered content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    /// Consumers should hide the image if `src` fails to load
    Image { src: String, caption: String },
    Quote { content: Vec<Inline> },
    List { items: Vec<Vec<Inline>> },
    Paragraph { content: Vec<Inline> },
}

/// Classification of a chunk, before its text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Image,
    Heading(u8),
    Quote,
    List,
    Paragraph,
}

const TITLE_PREFIX: &str = "# ";
const HEADING_PREFIX: &str = "## ";
const SUBHEADING_PREFIX: &str = "### ";
const QUOTE_PREFIX: &str = "> ";
const ITEM_PREFIX: &str = "- ";

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image pattern is valid"))
}

fn chunk_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\n+").expect("separator pattern is valid"))
}

/// Cut content at blank lines, keeping chunks untrimmed and in order
pub(crate) fn split_chunks(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n");
    chunk_separator()
        .split(&normalized)
        .map(str::to_string)
        .collect()
}

impl BlockKind {
    /// Classify a trimmed chunk
    pub fn classify(chunk: &str) -> Self {
        if chunk.starts_with(TITLE_PREFIX) {
            BlockKind::Title
        } else if image_pattern().is_match(chunk) {
            BlockKind::Image
        } else if chunk.starts_with(HEADING_PREFIX) {
            BlockKind::Heading(2)
        } else if chunk.starts_with(SUBHEADING_PREFIX) {
            BlockKind::Heading(3)
        } else if chunk.starts_with(QUOTE_PREFIX) {
            BlockKind::Quote
        } else if chunk.starts_with(ITEM_PREFIX) || chunk.contains("\n- ") {
            BlockKind::List
        } else {
            BlockKind::Paragraph
        }
    }
}

impl Block {
    /// Build the block for one chunk; titles and blank chunks yield nothing
    pub fn from_chunk(chunk: &str) -> Option<Self> {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            return None;
        }

        let block = match BlockKind::classify(chunk) {
            BlockKind::Title => return None,
            BlockKind::Image => {
                let caps = image_pattern().captures(chunk)?;
                Block::Image {
                    caption: caps[1].to_string(),
                    src: caps[2].to_string(),
                }
            }
            BlockKind::Heading(level) => {
                let prefix = if level == 2 {
                    HEADING_PREFIX
                } else {
                    SUBHEADING_PREFIX
                };
                Block::Heading {
                    level,
                    content: parse_inline(&chunk[prefix.len()..]),
                }
            }
            BlockKind::Quote => Block::Quote {
                content: parse_inline(&chunk[QUOTE_PREFIX.len()..]),
            },
            BlockKind::List => Block::List {
                items: chunk
                    .lines()
                    .map(str::trim)
                    .filter(|line| line.starts_with(ITEM_PREFIX))
                    .map(|line| parse_inline(line[1..].trim_start()))
                    .collect(),
            },
            BlockKind::Paragraph => Block::Paragraph {
                content: parse_inline(chunk),
            },
        };
        Some(block)
    }
}

/// One-shot iterator over the blocks of a body
pub struct Blocks {
    chunks: std::vec::IntoIter<String>,
}

impl Iterator for Blocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        self.chunks.by_ref().find_map(|chunk| Block::from_chunk(&chunk))
    }
}

/// Segment a body into blocks, in order
pub fn blocks(content: &str) -> Blocks {
    Blocks {
        chunks: split_chunks(content).into_iter(),
    }
}

/// An article body ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArticle {
    /// Oversized intro paragraph shown above the body
    pub lead: Option<String>,
    pub blocks: Vec<Block>,
}

/// Choose the lead and segment the remaining body
///
/// An explicit description is always the lead and the whole content stays
/// in the body. Otherwise the lead is taken from the content.
pub fn render_article(article: &Article) -> RenderedArticle {
    match article.lead_description() {
        Some(description) => RenderedArticle {
            lead: Some(description.to_string()),
            blocks: blocks(&article.content).collect(),
        },
        None => {
            let split = extract_lead(&article.content);
            RenderedArticle {
                lead: split.lead,
                blocks: blocks(&split.body).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn paragraph(s: &str) -> Block {
        Block::Paragraph {
            content: vec![text(s)],
        }
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(BlockKind::classify("# Title"), BlockKind::Title);
        assert_eq!(BlockKind::classify("## Heading"), BlockKind::Heading(2));
        assert_eq!(BlockKind::classify("### Sub"), BlockKind::Heading(3));
        assert_eq!(BlockKind::classify("> Quote"), BlockKind::Quote);
        assert_eq!(BlockKind::classify("- item"), BlockKind::List);
        assert_eq!(BlockKind::classify("intro\n- item"), BlockKind::List);
        assert_eq!(BlockKind::classify("#hashtag"), BlockKind::Paragraph);
        assert_eq!(BlockKind::classify("-not a list"), BlockKind::Paragraph);
        // Images win over headings, quotes and lists
        assert_eq!(BlockKind::classify("## See ![a](b)"), BlockKind::Image);
        assert_eq!(BlockKind::classify("> ![a](b)"), BlockKind::Image);
        // Titles win over images
        assert_eq!(BlockKind::classify("# ![a](b)"), BlockKind::Title);
    }

    #[test]
    fn test_title_is_suppressed() {
        let out: Vec<Block> = blocks("# Title\n\nFirst paragraph.").collect();
        assert_eq!(out, vec![paragraph("First paragraph.")]);
    }

    #[test]
    fn test_image_block() {
        let out: Vec<Block> =
            blocks("![Lemon groves above Ravello](https://img.example/ravello.jpg)").collect();
        assert_eq!(
            out,
            vec![Block::Image {
                src: "https://img.example/ravello.jpg".to_string(),
                caption: "Lemon groves above Ravello".to_string(),
            }]
        );
    }

    #[test]
    fn test_headings_and_quote_parse_inline() {
        let out: Vec<Block> = blocks("## The **Best** Views\n\n### Day *one*\n\n> Go *slowly*.").collect();
        assert_eq!(
            out,
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![
                        text("The "),
                        Inline::Strong("Best".to_string()),
                        text(" Views")
                    ],
                },
                Block::Heading {
                    level: 3,
                    content: vec![text("Day "), Inline::Emphasis("one".to_string())],
                },
                Block::Quote {
                    content: vec![
                        text("Go "),
                        Inline::Emphasis("slowly".to_string()),
                        text(".")
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_list_drops_non_item_lines() {
        let out: Vec<Block> = blocks("Pack these:\n- boots\n-   **water**\nand nothing else").collect();
        assert_eq!(
            out,
            vec![Block::List {
                items: vec![
                    vec![text("boots")],
                    vec![Inline::Strong("water".to_string())]
                ],
            }]
        );
    }

    #[test]
    fn test_blank_chunks_and_crlf() {
        let out: Vec<Block> = blocks("\r\n\r\nOne\r\n\r\n\r\n\r\n   \n\nTwo\n").collect();
        assert_eq!(out, vec![paragraph("One"), paragraph("Two")]);
        assert_eq!(blocks("").count(), 0);
    }

    #[test]
    fn test_blocks_are_deterministic() {
        let content = &defaults::articles()[0].content;
        let a: Vec<Block> = blocks(content).collect();
        let b: Vec<Block> = blocks(content).collect();
        assert_eq!(a, b);
        assert!(a.iter().any(|b| matches!(b, Block::Quote { .. })));
    }

    #[test]
    fn test_render_fixed_input() {
        let mut article = Article::with_id("a", "Title");
        article.content =
            "# Title\n\n*This is the lead.*\n\n## Section\n\nBody text with **bold** and *italic*."
                .to_string();

        let rendered = render_article(&article);
        assert_eq!(rendered.lead.as_deref(), Some("This is the lead."));
        assert_eq!(
            rendered.blocks,
            vec![
                Block::Heading {
                    level: 2,
                    content: vec![text("Section")],
                },
                Block::Paragraph {
                    content: vec![
                        text("Body text with "),
                        Inline::Strong("bold".to_string()),
                        text(" and "),
                        Inline::Emphasis("italic".to_string()),
                        text("."),
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_render_with_description_keeps_full_body() {
        let mut article = Article::with_id("a", "Title");
        article.description = Some("Explicit lead.".to_string());
        article.content = "# Title\n\nFirst paragraph.\n\nSecond.".to_string();

        let rendered = render_article(&article);
        assert_eq!(rendered.lead.as_deref(), Some("Explicit lead."));
        assert_eq!(
            rendered.blocks,
            vec![paragraph("First paragraph."), paragraph("Second.")]
        );
    }

    #[test]
    fn test_render_seed_article() {
        let amalfi = &defaults::articles()[1];
        let rendered = render_article(amalfi);
        assert_eq!(rendered.lead, amalfi.description);
        assert_eq!(rendered.blocks.len(), 4);
        assert!(matches!(rendered.blocks[3], Block::Image { .. }));
    }
}
