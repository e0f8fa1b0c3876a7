//! Sync coordinator
//!
//! Owns the in-memory article list and site configuration, and keeps them
//! consistent with the remote store and the local cache.
//!
//! ## Load
//!
//! Remote articles win when there are any, then the local cache, then the
//! bundled defaults. The site configuration is read from the cache
//! independently. Any failure on the way resets the list to the defaults, so
//! a load always ends with content.
//!
//! ## Writes
//!
//! Every write goes to the remote store first. Only after it succeeds is the
//! in-memory list changed and the full list backed up to the cache. A failed
//! remote write leaves memory and cache untouched.
//!
//! Every protocol takes `&mut self`, so two protocols can never interleave on
//! one coordinator. Callers sharing a coordinator wrap it in a mutex and the
//! last load to finish wins.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::defaults;
use crate::models::{Article, SiteConfig};
use crate::remote::{self, RemoteError, RemoteStore};
use crate::storage::{CacheError, LocalCache, SqliteCache};
use crate::toast::{Severity, Toast, ToastQueue};

pub const MSG_CREATED: &str = "Article published to the cloud.";
pub const MSG_CREATE_FAILED: &str = "Error while publishing to the cloud.";
pub const MSG_UPDATED: &str = "Article updated in the cloud.";
pub const MSG_UPDATE_FAILED: &str = "Cloud update failed.";
pub const MSG_DELETED: &str = "Article removed from the cloud.";
pub const MSG_DELETE_FAILED: &str = "Error while deleting from the cloud.";
pub const MSG_PROTECTED: &str = "System articles cannot be removed.";
pub const MSG_LOAD_FALLBACK: &str = "Cloud error: data loaded in local mode.";
pub const MSG_SEEDED: &str = "Cloud database initialized.";
pub const MSG_SEED_FAILED: &str = "Cloud initialization failed.";
pub const MSG_SITE_SAVED: &str = "Homepage design saved locally.";
pub const MSG_SITE_SAVE_FAILED: &str = "Homepage design could not be saved.";
pub const MSG_BACKUP_FAILED: &str = "Saved to the cloud, but the local backup failed.";

/// Where the current article list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Remote,
    LocalCache,
    Defaults,
    /// A failure during load forced the defaults
    Fallback,
}

impl std::fmt::Display for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoadSource::Remote => "remote store",
            LoadSource::LocalCache => "local cache",
            LoadSource::Defaults => "built-in defaults",
            LoadSource::Fallback => "built-in defaults (after error)",
        };
        f.write_str(label)
    }
}

/// Errors returned by write protocols
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Local cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Article '{0}' is a system article and cannot be removed")]
    ProtectedArticle(String),
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

pub struct SyncCoordinator {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn LocalCache>,
    clock: Arc<dyn Clock>,
    articles: Vec<Article>,
    site_config: SiteConfig,
    selected: Option<Article>,
    toasts: ToastQueue,
    last_source: Option<LoadSource>,
    loading: bool,
}

impl SyncCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn LocalCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            remote,
            cache,
            clock,
            articles: Vec::new(),
            site_config: defaults::site_config(),
            selected: None,
            toasts: ToastQueue::new(),
            last_source: None,
            loading: false,
        }
    }

    /// Wire up the configured remote store and the on-disk cache
    pub fn open(config: &Config) -> SyncResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = SqliteCache::open(&config.cache_path(), clock.clone())?;
        Ok(Self::new(remote::connect(config), Arc::new(cache), clock))
    }

    // ==================== Load ====================

    /// Run the load protocol; always ends with a non-empty list
    pub async fn load(&mut self) -> LoadSource {
        self.loading = true;

        let source = match self.try_load().await {
            Ok(source) => source,
            Err(e) => {
                error!("Sync failed, falling back to defaults: {}", e);
                self.articles = defaults::articles();
                self.notify(Severity::Error, MSG_LOAD_FALLBACK);
                LoadSource::Fallback
            }
        };

        self.last_source = Some(source);
        self.loading = false;
        info!("Loaded {} articles from {}", self.articles.len(), source);
        source
    }

    async fn try_load(&mut self) -> Result<LoadSource, CacheError> {
        let cloud = self.remote.load_articles().await;

        let (articles, source) = if !cloud.is_empty() {
            (cloud, LoadSource::Remote)
        } else {
            match self.cache.load_articles().await? {
                Some(local) if !local.is_empty() => (local, LoadSource::LocalCache),
                _ => (defaults::articles(), LoadSource::Defaults),
            }
        };
        self.articles = articles;

        if let Some(config) = self.cache.load_config().await? {
            debug!("Using cached site configuration");
            self.site_config = config;
        }

        Ok(source)
    }

    // ==================== Writes ====================

    /// Create: remote first, then prepend in memory, then back up
    pub async fn add_article(&mut self, mut article: Article) -> SyncResult<()> {
        if let Err(e) = self.remote.save_article(&article).await {
            error!("Failed to publish article '{}': {}", article.id, e);
            self.notify(Severity::Error, MSG_CREATE_FAILED);
            return Err(e.into());
        }

        article.mark_pending();
        self.articles.insert(0, article);
        self.backup(MSG_CREATED).await
    }

    /// Update: remote first, then replace by id, then back up
    pub async fn update_article(&mut self, mut article: Article) -> SyncResult<()> {
        if let Err(e) = self.remote.save_article(&article).await {
            error!("Failed to update article '{}': {}", article.id, e);
            self.notify(Severity::Error, MSG_UPDATE_FAILED);
            return Err(e.into());
        }

        article.mark_pending();
        for existing in self.articles.iter_mut().filter(|a| a.id == article.id) {
            *existing = article.clone();
        }
        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == article.id) {
            *selected = article;
        }
        self.backup(MSG_UPDATED).await
    }

    /// Delete: refuse seed articles, then remote, then filter, then back up
    pub async fn delete_article(&mut self, id: &str) -> SyncResult<()> {
        if defaults::is_seed_article(id) {
            warn!("Refusing to delete system article '{}'", id);
            self.notify(Severity::Error, MSG_PROTECTED);
            return Err(SyncError::ProtectedArticle(id.to_string()));
        }

        if let Err(e) = self.remote.delete_article(id).await {
            error!("Failed to delete article '{}': {}", id, e);
            self.notify(Severity::Error, MSG_DELETE_FAILED);
            return Err(e.into());
        }

        self.articles.retain(|a| a.id != id);
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.selected = None;
        }
        self.backup(MSG_DELETED).await
    }

    /// Write every bundled article to the remote store, then reload
    pub async fn seed_remote(&mut self) -> SyncResult<()> {
        self.loading = true;
        let seeded = self.remote.seed_database(&defaults::articles()).await;
        self.loading = false;

        if let Err(e) = seeded {
            error!("Remote seeding failed: {}", e);
            self.notify(Severity::Error, MSG_SEED_FAILED);
            return Err(e.into());
        }

        self.load().await;
        self.notify(Severity::Success, MSG_SEEDED);
        Ok(())
    }

    /// Replace the site configuration; persisted to the cache only
    pub async fn update_site_config(&mut self, config: SiteConfig) -> SyncResult<()> {
        self.site_config = config;
        match self.cache.save_config(&self.site_config).await {
            Ok(()) => {
                self.notify(Severity::Success, MSG_SITE_SAVED);
                Ok(())
            }
            Err(e) => {
                error!("Failed to save site configuration: {}", e);
                self.notify(Severity::Error, MSG_SITE_SAVE_FAILED);
                Err(e.into())
            }
        }
    }

    async fn backup(&mut self, success: &str) -> SyncResult<()> {
        match self.cache.save_articles(&self.articles).await {
            Ok(()) => {
                self.notify(Severity::Success, success);
                Ok(())
            }
            Err(e) => {
                error!("Local backup failed: {}", e);
                self.notify(Severity::Error, MSG_BACKUP_FAILED);
                Err(e.into())
            }
        }
    }

    // ==================== Selection ====================

    /// Open an article in the detail view by id or slug
    pub fn select(&mut self, key: &str) -> Option<&Article> {
        self.selected = catalog::find(&self.articles, key).cloned();
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Article> {
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // ==================== Accessors ====================

    /// Read-only view of the current list
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn site_config(&self) -> &SiteConfig {
        &self.site_config
    }

    pub fn last_source(&self) -> Option<LoadSource> {
        self.last_source
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn remote_ready(&self) -> bool {
        self.remote.is_ready()
    }

    /// Toasts that have not expired yet
    pub fn toasts(&mut self) -> Vec<Toast> {
        let now = self.clock.now();
        self.toasts.active(now)
    }

    /// Hand every pending toast to the caller
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain()
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        let now = self.clock.now();
        self.toasts.push(message, severity, now);
    }
}
