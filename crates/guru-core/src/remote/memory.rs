//! In-process remote store
//!
//! Behaves like the hosted store (server-assigned timestamps, newest-first
//! listing, upsert by id) and adds failure injection and call counters.

use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{prepare_for_save, RemoteError, RemoteResult, RemoteStore};
use crate::models::{Article, ServerTimestamp};

#[derive(Debug, Default)]
struct MemoryState {
    articles: Vec<Article>,
    failing: bool,
    tick: i64,
    load_calls: usize,
    save_calls: usize,
    delete_calls: usize,
}

impl MemoryState {
    /// Next server time; one second per write
    fn request_time(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        DateTime::<Utc>::default() + Duration::seconds(self.tick)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `articles` already stored, stamped oldest-last
    pub fn with_articles(articles: Vec<Article>) -> Self {
        let remote = Self::new();
        {
            let mut state = remote.lock();
            for mut article in articles.into_iter().rev() {
                let now = state.request_time();
                article.created_at = ServerTimestamp::Confirmed(now);
                article.updated_at = ServerTimestamp::Confirmed(now);
                state.articles.push(article);
            }
        }
        remote
    }

    /// Make every subsequent call fail (listing returns nothing)
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Stored articles, newest first
    pub fn snapshot(&self) -> Vec<Article> {
        sorted(&self.lock().articles)
    }

    pub fn load_calls(&self) -> usize {
        self.lock().load_calls
    }

    pub fn save_calls(&self) -> usize {
        self.lock().save_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.lock().delete_calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn sorted(articles: &[Article]) -> Vec<Article> {
    let mut list = articles.to_vec();
    list.sort_by_key(|a| Reverse(a.created_at.confirmed()));
    list
}

fn unavailable(operation: &str) -> RemoteError {
    RemoteError::Unavailable(format!("simulated failure during {}", operation))
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    fn is_ready(&self) -> bool {
        true
    }

    async fn load_articles(&self) -> Vec<Article> {
        let mut state = self.lock();
        state.load_calls += 1;
        if state.failing {
            return Vec::new();
        }
        sorted(&state.articles)
    }

    async fn save_article(&self, article: &Article) -> RemoteResult<()> {
        let mut state = self.lock();
        state.save_calls += 1;
        if state.failing {
            return Err(unavailable("save"));
        }

        let mut stored = prepare_for_save(article);
        let now = state.request_time();
        let existing = state.articles.iter().position(|a| a.id == stored.id);

        stored.updated_at = ServerTimestamp::Confirmed(now);
        stored.created_at = match (stored.created_at, existing) {
            (ServerTimestamp::Confirmed(at), _) => ServerTimestamp::Confirmed(at),
            (ServerTimestamp::Pending, Some(index)) => state.articles[index].created_at,
            _ => ServerTimestamp::Confirmed(now),
        };

        match existing {
            Some(index) => state.articles[index] = stored,
            None => state.articles.push(stored),
        }
        Ok(())
    }

    async fn delete_article(&self, id: &str) -> RemoteResult<()> {
        let mut state = self.lock();
        state.delete_calls += 1;
        if state.failing {
            return Err(unavailable("delete"));
        }
        state.articles.retain(|a| a.id != id);
        Ok(())
    }

    async fn slug_exists(&self, slug: &str) -> RemoteResult<bool> {
        let state = self.lock();
        if state.failing {
            return Err(unavailable("query"));
        }
        Ok(state.articles.iter().any(|a| a.slug == slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[tokio::test]
    async fn test_with_articles_keeps_given_order() {
        let remote = MemoryRemote::with_articles(defaults::articles());
        let ids: Vec<String> = remote.load_articles().await.into_iter().map(|a| a.id).collect();
        assert_eq!(ids, defaults::SEED_IDS);
    }

    #[tokio::test]
    async fn test_save_assigns_server_timestamps_and_lists_newest_first() {
        let remote = MemoryRemote::new();
        remote.save_article(&Article::with_id("old", "Old")).await.unwrap();
        remote.save_article(&Article::with_id("new", "New")).await.unwrap();

        let listed = remote.load_articles().await;
        assert_eq!(listed[0].id, "new");
        assert_eq!(listed[1].id, "old");
        assert!(listed[0].created_at.confirmed().is_some());
        assert_eq!(listed[0].published, Some(true));
    }

    #[tokio::test]
    async fn test_update_keeps_creation_time() {
        let remote = MemoryRemote::new();
        remote.save_article(&Article::with_id("a", "First")).await.unwrap();
        let created = remote.snapshot()[0].created_at;

        let mut edited = Article::with_id("a", "Edited");
        edited.created_at = ServerTimestamp::Pending;
        remote.save_article(&edited).await.unwrap();

        let stored = &remote.snapshot()[0];
        assert_eq!(stored.title, "Edited");
        assert_eq!(stored.created_at, created);
        assert_ne!(stored.updated_at, created);
        assert_eq!(remote.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let remote = MemoryRemote::with_articles(defaults::articles());
        remote.set_failing(true);

        assert!(remote.load_articles().await.is_empty());
        assert!(remote.save_article(&Article::with_id("x", "X")).await.is_err());
        assert!(remote.delete_article("amalfi-cloud").await.is_err());
        assert!(remote.slug_exists("x").await.is_err());
        assert_eq!(remote.save_calls(), 1);
        assert_eq!(remote.delete_calls(), 1);

        remote.set_failing(false);
        assert_eq!(remote.load_articles().await.len(), 2);
    }

    #[tokio::test]
    async fn test_slug_exists_and_delete() {
        let remote = MemoryRemote::with_articles(defaults::articles());
        assert!(remote
            .slug_exists("hidden-gems-of-the-amalfi-coast")
            .await
            .unwrap());
        remote.delete_article("amalfi-cloud").await.unwrap();
        assert!(!remote
            .slug_exists("hidden-gems-of-the-amalfi-coast")
            .await
            .unwrap());
    }
}
