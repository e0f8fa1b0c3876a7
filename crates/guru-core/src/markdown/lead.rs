//! Lead paragraph extraction

use super::inline::strip_emphasis;
use super::split_chunks;

/// Content split into an intro paragraph and the remaining body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSplit {
    pub lead: Option<String>,
    /// Remaining chunks, rejoined with blank lines
    pub body: String,
}

/// Pick a lead paragraph out of the content
///
/// A leading `# ` title chunk is skipped. The next chunk becomes the lead if
/// it is wrapped in single-asterisk emphasis (markers removed) or if it is
/// not a heading, quote or image (all markers removed). Otherwise there is
/// no lead and the body is everything after the title.
pub fn extract_lead(content: &str) -> LeadSplit {
    if content.is_empty() {
        return LeadSplit {
            lead: None,
            body: String::new(),
        };
    }

    let chunks = split_chunks(content);
    let start = match chunks.first() {
        Some(first) if first.trim().starts_with("# ") => 1,
        _ => 0,
    };
    let rest = |from: usize| chunks[from.min(chunks.len())..].join("\n\n");

    let first = match chunks.get(start).map(|c| c.trim()).filter(|c| !c.is_empty()) {
        Some(first) => first,
        None => {
            return LeadSplit {
                lead: None,
                body: rest(start),
            }
        }
    };

    if is_wrapped_in_emphasis(first) {
        return LeadSplit {
            lead: Some(first[1..first.len() - 1].to_string()),
            body: rest(start + 1),
        };
    }

    if !first.starts_with('#') && !first.starts_with("> ") && !first.starts_with('!') {
        return LeadSplit {
            lead: Some(strip_emphasis(first)),
            body: rest(start + 1),
        };
    }

    LeadSplit {
        lead: None,
        body: rest(start),
    }
}

fn is_wrapped_in_emphasis(chunk: &str) -> bool {
    chunk.len() >= 2 && chunk.starts_with('*') && chunk.ends_with('*') && !chunk.starts_with("**")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_italic_lead_after_title() {
        let split = extract_lead("# Title\n\n*This is the lead.*\n\n## Section");
        assert_eq!(split.lead.as_deref(), Some("This is the lead."));
        assert_eq!(split.body, "## Section");
    }

    #[test]
    fn test_plain_paragraph_becomes_lead_without_markers() {
        let split = extract_lead("A **bold** start.\n\nMore text.");
        assert_eq!(split.lead.as_deref(), Some("A bold start."));
        assert_eq!(split.body, "More text.");
    }

    #[test]
    fn test_no_lead_when_first_chunk_is_heading_quote_or_image() {
        for content in [
            "## Heading\n\nText",
            "> Quote\n\nText",
            "![alt](src)\n\nText",
            "# Title\n\n### Sub\n\nText",
        ] {
            let split = extract_lead(content);
            assert!(split.lead.is_none(), "unexpected lead for {:?}", content);
        }

        let split = extract_lead("# Title\n\n## Heading\n\nText");
        assert_eq!(split.body, "## Heading\n\nText");
    }

    #[test]
    fn test_strong_wrapped_chunk_is_not_italic_lead() {
        let split = extract_lead("**Bold intro**\n\nRest");
        assert_eq!(split.lead.as_deref(), Some("Bold intro"));
        assert_eq!(split.body, "Rest");
    }

    #[test]
    fn test_empty_and_title_only_content() {
        assert_eq!(
            extract_lead(""),
            LeadSplit {
                lead: None,
                body: String::new()
            }
        );
        let split = extract_lead("# Only a title");
        assert!(split.lead.is_none());
        assert_eq!(split.body, "");
    }
}
