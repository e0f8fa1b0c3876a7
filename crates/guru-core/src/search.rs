//! Substring search and highlighting
//!
//! Search is a case-insensitive substring filter over title, description,
//! content, category and location. Results keep list order; there is no
//! ranking. A blank query means search is inactive and matches nothing.

use regex::{Regex, RegexBuilder};

use crate::models::Article;

/// A compiled, non-blank query
#[derive(Debug, Clone)]
pub struct SearchQuery {
    raw: String,
    pattern: Regex,
}

impl SearchQuery {
    /// Compile a query; returns `None` when it is blank after trimming
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        // The query is escaped, so building can only fail on size limits
        let pattern = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self {
            raw: trimmed.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Check every searchable field of an article
    pub fn matches(&self, article: &Article) -> bool {
        self.is_match(&article.title)
            || article
                .description
                .as_deref()
                .is_some_and(|d| self.is_match(d))
            || self.is_match(&article.content)
            || self.is_match(article.category.as_str())
            || self.is_match(&article.location)
    }

    /// Split text into matched and unmatched segments
    pub fn highlight<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for m in self.pattern.find_iter(text) {
            if m.start() > cursor {
                segments.push(Segment::Plain(&text[cursor..m.start()]));
            }
            segments.push(Segment::Match(m.as_str()));
            cursor = m.end();
        }
        if cursor < text.len() {
            segments.push(Segment::Plain(&text[cursor..]));
        }
        segments
    }

    /// Wrap every match in `open`/`close` markers
    pub fn highlight_with(&self, text: &str, open: &str, close: &str) -> String {
        self.highlight(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Plain(s) => s.to_string(),
                Segment::Match(s) => format!("{}{}{}", open, s, close),
            })
            .collect()
    }
}

/// Piece of highlighted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

/// Articles matching `query`, in list order
pub fn search<'a>(articles: &'a [Article], query: &str) -> Vec<&'a Article> {
    match SearchQuery::new(query) {
        Some(query) => articles.iter().filter(|a| query.matches(a)).collect(),
        None => Vec::new(),
    }
}

/// Highlight `query` in `text`; a blank query leaves the text as one plain segment
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    match SearchQuery::new(query) {
        Some(query) => query.highlight(text),
        None if text.is_empty() => Vec::new(),
        None => vec![Segment::Plain(text)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::models::Category;

    fn kyoto() -> Article {
        let mut article = Article::with_id("k1", "Temples at Dusk");
        article.location = "KYOTO, JAPAN".to_string();
        article.category = Category::Asia;
        article.content = "Moss gardens and quiet lanes.".to_string();
        article
    }

    #[test]
    fn test_empty_query_is_inactive() {
        let articles = vec![kyoto()];
        assert!(search(&articles, "").is_empty());
        assert!(search(&articles, "   ").is_empty());
        assert!(SearchQuery::new("").is_none());
    }

    #[test]
    fn test_case_insensitive_location_match() {
        let articles = vec![kyoto()];
        assert_eq!(search(&articles, "KYOTO").len(), 1);
        assert_eq!(search(&articles, "kyoto").len(), 1);
        assert!(search(&articles, "osaka").is_empty());
    }

    #[test]
    fn test_searches_every_field() {
        let mut article = kyoto();
        article.description = Some("Incense and lanterns".to_string());
        let articles = vec![article];
        for query in ["temples", "lantern", "moss", "asia", "japan"] {
            assert_eq!(search(&articles, query).len(), 1, "query {:?}", query);
        }
    }

    #[test]
    fn test_preserves_list_order() {
        let articles = defaults::articles();
        let hits = search(&articles, "italy");
        let ids: Vec<&str> = hits.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, defaults::SEED_IDS);
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let mut article = kyoto();
        article.title = "Costs (in $) per day".to_string();
        let articles = vec![article];
        assert_eq!(search(&articles, "(in $)").len(), 1);
        assert!(search(&articles, ".*").is_empty());
    }

    #[test]
    fn test_highlight_wraps_exact_matches() {
        assert_eq!(
            highlight("KYOTO, JAPAN", "kyoto"),
            vec![Segment::Match("KYOTO"), Segment::Plain(", JAPAN")]
        );
        assert_eq!(
            highlight("Rome to rome", "ROME"),
            vec![
                Segment::Match("Rome"),
                Segment::Plain(" to "),
                Segment::Match("rome")
            ]
        );
        assert_eq!(highlight("nothing", "x"), vec![Segment::Plain("nothing")]);
        assert_eq!(highlight("text", ""), vec![Segment::Plain("text")]);
    }

    #[test]
    fn test_highlight_with_markers() {
        let query = SearchQuery::new("kyoto").unwrap();
        assert_eq!(
            query.highlight_with("Old Kyoto streets", "[", "]"),
            "Old [Kyoto] streets"
        );
    }
}
