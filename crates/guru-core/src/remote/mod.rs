//! Remote document store
//!
//! The remote store holds the canonical article collection. Callers treat it
//! as unreliable: listing never fails (errors are logged and an empty list is
//! returned) while writes report failures so the caller can abort.
//!
//! ## Implementations
//!
//! - [`FirestoreRemote`]: Firestore over its REST API
//! - [`OfflineRemote`]: used when no credentials are configured
//! - [`MemoryRemote`]: in-process collection for tests and demos

pub mod firestore;
pub mod memory;
pub mod offline;
pub mod value;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::Article;

pub use firestore::FirestoreRemote;
pub use memory::MemoryRemote;
pub use offline::OfflineRemote;

/// Name of the article collection
pub const COLLECTION: &str = "articles";

/// Errors reported by remote store writes and probes
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote store is not configured")]
    NotConfigured,

    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store rejected {operation} (HTTP {status}): {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid remote document '{name}': {details}")]
    InvalidDocument { name: String, details: String },

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Asynchronous client for the article collection
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// True only when credentials were present at construction
    fn is_ready(&self) -> bool;

    /// All articles, newest first. Failures yield an empty list.
    async fn load_articles(&self) -> Vec<Article>;

    /// Upsert by id. The server assigns `createdAt`/`updatedAt`.
    async fn save_article(&self, article: &Article) -> RemoteResult<()>;

    async fn delete_article(&self, id: &str) -> RemoteResult<()>;

    /// Check whether any stored article already uses `slug`
    async fn slug_exists(&self, slug: &str) -> RemoteResult<bool>;

    /// Upsert every article, one after another
    async fn seed_database(&self, articles: &[Article]) -> RemoteResult<()> {
        if !self.is_ready() {
            return Err(RemoteError::NotConfigured);
        }

        info!("Seeding remote store with {} articles", articles.len());
        for article in articles {
            self.save_article(article).await?;
        }
        info!("Remote seeding completed");
        Ok(())
    }
}

/// Copy of `article` as it should be written: unset `published` becomes true
pub fn prepare_for_save(article: &Article) -> Article {
    let mut prepared = article.clone();
    prepared.published.get_or_insert(true);
    prepared
}

/// Build the remote store described by `config`
///
/// Missing credentials disable the remote store and put the app in local
/// fallback mode.
pub fn connect(config: &Config) -> Arc<dyn RemoteStore> {
    match config.remote_credentials() {
        Some(credentials) => match FirestoreRemote::new(credentials) {
            Ok(remote) => {
                info!("Remote store initialized");
                Arc::new(remote)
            }
            Err(e) => {
                error!("Failed to initialize remote store: {}", e);
                Arc::new(OfflineRemote)
            }
        },
        None => {
            warn!("Remote credentials missing; operating in local fallback mode");
            Arc::new(OfflineRemote)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_prepare_for_save_defaults_published() {
        let article = Article::with_id("a", "Title");
        assert_eq!(prepare_for_save(&article).published, Some(true));

        let mut draft = Article::with_id("b", "Draft");
        draft.published = Some(false);
        assert_eq!(prepare_for_save(&draft).published, Some(false));
    }

    #[test]
    fn test_connect_without_credentials_is_offline() {
        let config = Config::default();
        let remote = connect(&config);
        assert!(!remote.is_ready());
    }

    #[test]
    fn test_connect_with_credentials_is_ready() {
        let config = Config {
            firebase_api_key: Some("key".to_string()),
            firebase_project_id: Some("guru-test".to_string()),
            firebase_app_id: Some("1:123:web:abc".to_string()),
            ..Config::default()
        };
        assert!(connect(&config).is_ready());
    }

    #[tokio::test]
    async fn test_seed_requires_ready_store() {
        let err = OfflineRemote
            .seed_database(&crate::defaults::articles())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotConfigured));
    }
}
