//! Local cache layer
//!
//! The cache mirrors the last known good remote state so the catalog can be
//! shown when the remote store is unreachable.
//!
//! ## Architecture
//!
//! - **LocalCache**: async contract used by the sync coordinator
//! - **SqliteCache**: SQLite implementation, one JSON body per row
//! - **RetryPolicy**: bounded retry loop wrapped around every operation
//!
//! Saving the article list is clear-then-repopulate. A failure anywhere in
//! that unit causes the whole unit to be retried.

pub mod error;
pub mod retry;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;

use crate::models::{Article, SiteConfig};

pub use error::{CacheError, CacheResult};
pub use retry::RetryPolicy;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteCache;

/// Persistent key-value store for articles and the site configuration
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Replace the stored article list with `articles`
    async fn save_articles(&self, articles: &[Article]) -> CacheResult<()>;

    /// Stored articles in saved order, or `None` when the cache is empty
    async fn load_articles(&self) -> CacheResult<Option<Vec<Article>>>;

    async fn save_config(&self, config: &SiteConfig) -> CacheResult<()>;

    async fn load_config(&self) -> CacheResult<Option<SiteConfig>>;
}
