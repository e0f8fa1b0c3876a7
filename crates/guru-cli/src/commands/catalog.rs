//! Public reading commands: feed, browse, show and search

use anyhow::{bail, Result};

use guru_core::catalog::{self, HOME_FEED_SIZE, RELATED_SIZE};
use guru_core::markdown;
use guru_core::search;
use guru_core::{CategoryFilter, SyncCoordinator};

use crate::output::{Output, OutputFormat};

/// Homepage: hero copy plus the newest stories
pub fn feed(sync: &SyncCoordinator, output: &Output) -> Result<()> {
    let latest: Vec<_> = catalog::home_feed(sync.articles(), HOME_FEED_SIZE)
        .iter()
        .collect();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({"site": sync.site_config(), "latest": latest})
            );
        }
        OutputFormat::Human => {
            let site = sync.site_config();
            println!("{} {}", site.hero_title, site.hero_highlight);
            println!("{}", site.hero_subtitle);
            println!();
            output.print_articles(&latest);
        }
        OutputFormat::Quiet => output.print_articles(&latest),
    }
    Ok(())
}

/// Destinations view: category filter plus a title/location filter
pub fn browse(
    sync: &SyncCoordinator,
    category: Option<CategoryFilter>,
    query: Option<String>,
    output: &Output,
) -> Result<()> {
    let filter = category.unwrap_or_default();
    let matches = catalog::browse(sync.articles(), filter, query.as_deref().unwrap_or(""));
    output.print_articles(&matches);
    Ok(())
}

/// Show a single article by id or slug
pub fn show(sync: &mut SyncCoordinator, key: String, output: &Output) -> Result<()> {
    let Some(article) = sync.select(&key).cloned() else {
        bail!("Article not found: {}", key);
    };

    let rendered = markdown::render_article(&article);
    let related = catalog::related(&article, sync.articles(), RELATED_SIZE);
    output.print_article(&article, &rendered, &related);
    Ok(())
}

/// Search title, description, body, category and location
///
/// A blank query is an inactive search and prints an empty result.
pub fn search(sync: &SyncCoordinator, query: String, output: &Output) -> Result<()> {
    let hits = search::search(sync.articles(), &query);
    output.print_search_results(query.trim(), &hits);
    Ok(())
}
