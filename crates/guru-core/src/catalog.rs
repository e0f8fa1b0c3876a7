//! Read-only views over the article list
//!
//! These back the home feed, the destinations page and the "related stories"
//! strip. The list is assumed to already be newest first.

use crate::models::{Article, CategoryFilter};

/// Number of articles on the home feed
pub const HOME_FEED_SIZE: usize = 3;

/// Number of related articles shown under a story
pub const RELATED_SIZE: usize = 3;

/// The first `limit` articles
pub fn home_feed(articles: &[Article], limit: usize) -> &[Article] {
    &articles[..limit.min(articles.len())]
}

/// Articles passing a category filter, in list order
pub fn by_category(articles: &[Article], filter: CategoryFilter) -> Vec<&Article> {
    articles
        .iter()
        .filter(|a| filter.accepts(a.category))
        .collect()
}

/// Destinations view: category filter plus a title/location substring match
///
/// An empty query matches everything.
pub fn browse<'a>(articles: &'a [Article], filter: CategoryFilter, query: &str) -> Vec<&'a Article> {
    let needle = query.to_lowercase();
    articles
        .iter()
        .filter(|a| filter.accepts(a.category))
        .filter(|a| {
            needle.is_empty()
                || a.title.to_lowercase().contains(&needle)
                || a.location.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Up to `limit` other articles, in list order
pub fn related<'a>(article: &Article, articles: &'a [Article], limit: usize) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|a| a.id != article.id)
        .take(limit)
        .collect()
}

/// Look an article up by id, falling back to slug
pub fn find<'a>(articles: &'a [Article], key: &str) -> Option<&'a Article> {
    articles
        .iter()
        .find(|a| a.id == key)
        .or_else(|| articles.iter().find(|a| !a.slug.is_empty() && a.slug == key))
}
