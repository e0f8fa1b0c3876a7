//! Data models for Travel Guru
//!
//! Defines the core data structures: Article, Category, Intel and SiteConfig.
//! Field names serialise in camelCase so the same shape is used by the
//! remote document store and the local cache.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::defaults;
use crate::slug::slugify;

/// Article category (closed set)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Adventure")]
    Adventure,
    #[serde(rename = "Luxury")]
    Luxury,
    #[serde(rename = "Budget")]
    Budget,
    #[serde(rename = "Culture")]
    Culture,
    #[serde(rename = "Oceania")]
    Oceania,
    #[serde(rename = "Nordic States")]
    Nordic,
    #[serde(rename = "Asia")]
    Asia,
    #[default]
    #[serde(rename = "Europe")]
    Europe,
}

impl Category {
    /// Every category, in menu order
    pub const ALL: [Category; 8] = [
        Category::Adventure,
        Category::Luxury,
        Category::Budget,
        Category::Culture,
        Category::Oceania,
        Category::Nordic,
        Category::Asia,
        Category::Europe,
    ];

    /// Display name (also the stored value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Adventure => "Adventure",
            Category::Luxury => "Luxury",
            Category::Budget => "Budget",
            Category::Culture => "Culture",
            Category::Oceania => "Oceania",
            Category::Nordic => "Nordic States",
            Category::Asia => "Asia",
            Category::Europe => "Europe",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| {
                c.as_str().eq_ignore_ascii_case(wanted)
                    || format!("{:?}", c).eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category selector used when browsing ("All Posts" or one category)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Label shown for the catch-all filter
    pub const ALL_LABEL: &'static str = "All Posts";

    /// Check whether a category passes this filter
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(Self::ALL_LABEL) || trimmed.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        trimmed.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL_LABEL),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

/// Side-panel facts shown next to an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intel {
    #[serde(default)]
    pub best_time: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub must_try: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
}

/// Timestamp assigned by the remote store
///
/// Never compared or computed on the client: `Pending` means a write was
/// acknowledged but the server value has not been read back yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTimestamp {
    #[default]
    Unset,
    Pending,
    Confirmed(DateTime<Utc>),
}

impl ServerTimestamp {
    pub fn is_unset(&self) -> bool {
        matches!(self, ServerTimestamp::Unset)
    }

    /// The server-confirmed value, if any
    pub fn confirmed(&self) -> Option<DateTime<Utc>> {
        match self {
            ServerTimestamp::Confirmed(at) => Some(*at),
            _ => None,
        }
    }
}

/// A magazine article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable unique identifier, used as the store and cache key
    pub id: String,
    /// URL identifier derived from the title
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: Category,
    /// Fallback image for card and hero
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image_url: Option<String>,
    /// Legacy pull quote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    /// Explicit lead paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body in the markdown subset understood by [`crate::markdown`]
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intel: Option<Intel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default)]
    pub created_at: ServerTimestamp,
    #[serde(default)]
    pub updated_at: ServerTimestamp,
}

impl Article {
    /// Create a new article with a generated id and a slug derived from the title
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(format!("art-{}", Uuid::new_v4().simple()), title)
    }

    /// Create an article with a specific id
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            slug: slugify(&title),
            title,
            location: String::new(),
            category: Category::default(),
            image_url: String::new(),
            card_image_url: None,
            hero_image_url: None,
            quote: None,
            description: None,
            content: String::new(),
            intel: None,
            published: None,
            created_at: ServerTimestamp::Unset,
            updated_at: ServerTimestamp::Unset,
        }
    }

    /// Image used on cards, falling back to `image_url`
    pub fn card_image(&self) -> &str {
        non_empty(self.card_image_url.as_deref()).unwrap_or(&self.image_url)
    }

    /// Image used in the article header, falling back to `image_url`
    pub fn hero_image(&self) -> &str {
        non_empty(self.hero_image_url.as_deref()).unwrap_or(&self.image_url)
    }

    /// The explicit lead paragraph, ignoring blank descriptions
    pub fn lead_description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Visibility flag; articles without one are treated as published
    pub fn is_published(&self) -> bool {
        self.published.unwrap_or(true)
    }

    /// Recompute the slug from the current title
    pub fn refresh_slug(&mut self) {
        self.slug = slugify(&self.title);
    }

    /// Record that a write was acknowledged and the server owns the timestamps now
    pub fn mark_pending(&mut self) {
        if self.created_at.is_unset() {
            self.created_at = ServerTimestamp::Pending;
        }
        self.updated_at = ServerTimestamp::Pending;
        self.published.get_or_insert(true);
    }

    /// Best time to visit, with display fallback
    pub fn best_time(&self) -> &str {
        self.intel_field(|i| &i.best_time).unwrap_or("Year Round")
    }

    /// Budget tier, with display fallback
    pub fn budget(&self) -> &str {
        self.intel_field(|i| &i.budget).unwrap_or("Flexible")
    }

    /// Recommended highlight, with display fallback
    pub fn must_try(&self) -> &str {
        self.intel_field(|i| &i.must_try)
            .unwrap_or("Local Experiences")
    }

    fn intel_field(&self, field: impl Fn(&Intel) -> &String) -> Option<&str> {
        self.intel
            .as_ref()
            .map(|i| field(i).as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Homepage presentation settings (single record, cached locally only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub hero_image_url: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_highlight: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        defaults::site_config()
    }
}
