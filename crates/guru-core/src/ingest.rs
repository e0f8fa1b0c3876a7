//! Third-party article submission
//!
//! Backs `POST /api/posts`: checks the bearer token, validates the payload,
//! finds a free slug by probing the remote store and writes a new article.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::constant_time_eq;
use crate::models::{Article, Category, Intel};
use crate::remote::{RemoteError, RemoteStore};
use crate::slug::slugify;

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_CONTENT_CHARS: usize = 100;

/// Slug candidates tried: `base`, then `base-2` up to `base-100`
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

pub const DEFAULT_LOCATION: &str = "DISCOVERED, WORLD";

/// Submission payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub hero_image: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// What the client gets back for a created article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReceipt {
    pub id: String,
    pub slug: String,
    pub url: String,
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unauthorized: Missing or invalid Bearer token")]
    Unauthorized,

    #[error("Missing mandatory fields: title and content are required.")]
    MissingFields,

    #[error("Title must be at least {MIN_TITLE_CHARS} characters long")]
    TitleTooShort,

    #[error("Content must be at least {MIN_CONTENT_CHARS} characters long")]
    ContentTooShort,

    #[error("Slug must contain at least one letter or digit")]
    EmptySlug,

    #[error("Unknown category: '{0}'")]
    InvalidCategory(String),

    #[error("Could not generate unique slug after {MAX_SLUG_ATTEMPTS} attempts")]
    SlugExhausted,

    #[error("{0}")]
    Remote(#[from] RemoteError),
}

impl IngestError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            IngestError::Unauthorized => 401,
            IngestError::MissingFields
            | IngestError::TitleTooShort
            | IngestError::ContentTooShort
            | IngestError::EmptySlug
            | IngestError::InvalidCategory(_) => 400,
            IngestError::SlugExhausted | IngestError::Remote(_) => 500,
        }
    }
}

/// Check an `Authorization` header value against the server secret
pub fn verify_bearer(header: Option<&str>, secret: &str) -> Result<(), IngestError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(IngestError::Unauthorized)?;
    if constant_time_eq(token.as_bytes(), secret.as_bytes()) {
        Ok(())
    } else {
        Err(IngestError::Unauthorized)
    }
}

pub struct Ingestor {
    remote: Arc<dyn RemoteStore>,
    site_url: String,
}

impl Ingestor {
    pub fn new(remote: Arc<dyn RemoteStore>, site_url: impl Into<String>) -> Self {
        Self {
            remote,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remote.is_ready()
    }

    /// Validate and store a submission
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestReceipt, IngestError> {
        let mut article = self.build_article(&request)?;
        article.slug = self.unique_slug(&article.slug).await?;

        self.remote.save_article(&article).await?;
        info!("Ingested article '{}' as '{}'", article.id, article.slug);

        Ok(IngestReceipt {
            url: format!("{}/{}", self.site_url, article.slug),
            id: article.id,
            slug: article.slug,
        })
    }

    /// First free slug among `base`, `base-2`, ... `base-100`
    pub async fn unique_slug(&self, base: &str) -> Result<String, IngestError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 1 {
                base.to_string()
            } else {
                format!("{}-{}", base, attempt)
            };
            if !self.remote.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        warn!("No free slug for '{}'", base);
        Err(IngestError::SlugExhausted)
    }

    fn build_article(&self, request: &IngestRequest) -> Result<Article, IngestError> {
        let title = non_blank(&request.title).ok_or(IngestError::MissingFields)?;
        let content = non_blank(&request.content).ok_or(IngestError::MissingFields)?;

        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(IngestError::TitleTooShort);
        }
        if content.chars().count() < MIN_CONTENT_CHARS {
            return Err(IngestError::ContentTooShort);
        }

        let category = match non_blank(&request.category) {
            Some(name) => name
                .parse::<Category>()
                .map_err(|_| IngestError::InvalidCategory(name.to_string()))?,
            None => Category::Europe,
        };

        let slug = slugify(non_blank(&request.slug).unwrap_or(title));
        if slug.trim_matches('-').is_empty() {
            return Err(IngestError::EmptySlug);
        }

        let cover = non_blank(&request.cover_image).unwrap_or_default();
        let hero = non_blank(&request.hero_image).unwrap_or(cover);

        let mut article = Article::with_id(format!("api-{}", Uuid::new_v4().simple()), title);
        article.slug = slug;
        article.location = non_blank(&request.location)
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();
        article.content = content.to_string();
        article.category = category;
        article.image_url = cover.to_string();
        article.card_image_url = Some(cover.to_string());
        article.hero_image_url = Some(hero.to_string());
        article.description = non_blank(&request.description).map(str::to_string);
        article.intel = Some(Intel {
            best_time: "Consult Local Guru".to_string(),
            budget: "Flexible".to_string(),
            must_try: "Hidden Secrets".to_string(),
            vibe: None,
        });
        article.published = Some(true);
        Ok(article)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
