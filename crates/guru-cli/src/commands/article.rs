//! Article command handlers (admin)
//!
//! Every write goes through the sync coordinator, so the remote store is
//! written first and the local cache is only updated on success.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use guru_core::{catalog, Article, Category, Intel, SyncCoordinator};

use crate::editor::{confirm_delete, edit_body, is_interactive};
use crate::output::Output;

/// Editable article fields shared by `create` and `edit`
#[derive(Args, Debug, Default, Clone)]
pub struct ArticleFields {
    /// Article title
    #[arg(short = 'T', long)]
    pub title: Option<String>,
    /// Location line, e.g. "KYOTO, JAPAN"
    #[arg(short, long)]
    pub location: Option<String>,
    /// Category (Adventure, Luxury, Budget, Culture, Oceania, Nordic States, Asia, Europe)
    #[arg(short, long)]
    pub category: Option<Category>,
    /// Markdown body (opens editor if neither this nor --content-file is given)
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read the markdown body from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    /// Short description shown as the lead
    #[arg(short, long)]
    pub description: Option<String>,
    /// Main image URL
    #[arg(long)]
    pub image: Option<String>,
    /// Image used on cards
    #[arg(long)]
    pub card_image: Option<String>,
    /// Image used in the article header
    #[arg(long)]
    pub hero_image: Option<String>,
    #[arg(long)]
    pub best_time: Option<String>,
    #[arg(long)]
    pub budget: Option<String>,
    #[arg(long)]
    pub must_try: Option<String>,
    #[arg(long)]
    pub vibe: Option<String>,
    /// Publish (true) or keep as draft (false)
    #[arg(long)]
    pub published: Option<bool>,
}

impl ArticleFields {
    fn body(&self) -> Result<Option<String>> {
        if let Some(ref content) = self.content {
            return Ok(Some(content.clone()));
        }
        match self.content_file {
            Some(ref path) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("Failed to read content file: {:?}", path)),
            None => Ok(None),
        }
    }

    fn touches_body(&self) -> bool {
        self.content.is_some() || self.content_file.is_some()
    }

    /// Copy every given field onto the article
    fn apply(&self, article: &mut Article) -> Result<()> {
        if let Some(ref title) = self.title {
            article.title = title.clone();
            article.refresh_slug();
        }
        if let Some(ref location) = self.location {
            article.location = location.to_uppercase();
        }
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(content) = self.body()? {
            article.content = content;
        }
        if let Some(ref description) = self.description {
            article.description = non_empty(description);
        }
        if let Some(ref image) = self.image {
            article.image_url = image.clone();
        }
        if let Some(ref image) = self.card_image {
            article.card_image_url = non_empty(image);
        }
        if let Some(ref image) = self.hero_image {
            article.hero_image_url = non_empty(image);
        }
        if let Some(published) = self.published {
            article.published = Some(published);
        }

        let touches_intel = self.best_time.is_some()
            || self.budget.is_some()
            || self.must_try.is_some()
            || self.vibe.is_some();
        if touches_intel {
            let intel = article.intel.get_or_insert_with(Intel::default);
            if let Some(ref v) = self.best_time {
                intel.best_time = v.clone();
            }
            if let Some(ref v) = self.budget {
                intel.budget = v.clone();
            }
            if let Some(ref v) = self.must_try {
                intel.must_try = v.clone();
            }
            if let Some(ref v) = self.vibe {
                intel.vibe = non_empty(v);
            }
        }
        Ok(())
    }
}

/// Create and publish a new article
pub async fn create(sync: &mut SyncCoordinator, fields: ArticleFields, output: &Output) -> Result<()> {
    let title = match fields.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => bail!("Article title is required (--title)"),
    };

    let mut article = Article::new(title);
    fields.apply(&mut article)?;

    if !fields.touches_body() && is_interactive() {
        article.content = edit_body(&article, true).context("Failed to edit article")?;
    }

    if article.content.trim().is_empty() {
        bail!("Article content cannot be empty");
    }

    let id = article.id.clone();
    sync.add_article(article)
        .await
        .context("Failed to publish article")?;

    if let Some(article) = catalog::find(sync.articles(), &id) {
        output.success(&format!("Created article: {} ({})", article.slug, article.id));
    }
    Ok(())
}

/// Edit an existing article by id or slug
pub async fn edit(
    sync: &mut SyncCoordinator,
    key: String,
    fields: ArticleFields,
    output: &Output,
) -> Result<()> {
    let mut article = catalog::find(sync.articles(), &key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Article not found: {}", key))?;

    fields.apply(&mut article)?;

    if !fields.touches_body() && fields.title.is_none() && is_interactive() {
        article.content = edit_body(&article, false).context("Failed to edit article")?;
    }

    let slug = article.slug.clone();
    sync.update_article(article)
        .await
        .context("Failed to update article")?;

    output.success(&format!("Updated article: {}", slug));
    Ok(())
}

/// Delete an article by id or slug
pub async fn delete(sync: &mut SyncCoordinator, key: String, yes: bool, output: &Output) -> Result<()> {
    let article = catalog::find(sync.articles(), &key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Article not found: {}", key))?;

    if output.should_prompt() && !yes {
        if !confirm_delete(&article)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    sync.delete_article(&article.id)
        .await
        .context("Failed to delete article")?;

    output.success(&format!("Deleted article: {}", article.id));
    Ok(())
}

/// Write the bundled articles to the remote store
pub async fn seed(sync: &mut SyncCoordinator, output: &Output) -> Result<()> {
    sync.seed_remote()
        .await
        .context("Failed to seed the remote store")?;

    output.success(&format!(
        "Seeded remote store; {} article(s) loaded",
        sync.articles().len()
    ));
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
