//! Remote store stand-in used when no credentials are configured

use async_trait::async_trait;
use tracing::warn;

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::models::Article;

/// Never ready; writes are skipped so local mode keeps working
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemote;

#[async_trait]
impl RemoteStore for OfflineRemote {
    fn is_ready(&self) -> bool {
        false
    }

    async fn load_articles(&self) -> Vec<Article> {
        Vec::new()
    }

    async fn save_article(&self, article: &Article) -> RemoteResult<()> {
        warn!("Cloud saving skipped for '{}': remote store not configured", article.id);
        Ok(())
    }

    async fn delete_article(&self, id: &str) -> RemoteResult<()> {
        warn!("Cloud delete skipped for '{}': remote store not configured", id);
        Ok(())
    }

    async fn slug_exists(&self, _slug: &str) -> RemoteResult<bool> {
        Err(RemoteError::NotConfigured)
    }
}
