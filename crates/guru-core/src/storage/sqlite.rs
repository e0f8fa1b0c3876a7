//! SQLite-backed local cache

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{CacheError, CacheResult};
use super::retry::RetryPolicy;
use super::schema::{init_schema, needs_init};
use super::LocalCache;
use crate::clock::Clock;
use crate::models::{Article, SiteConfig};

/// Key of the single site configuration record
const SITE_CONFIG_KEY: &str = "current";

/// Local cache stored in a SQLite database
pub struct SqliteCache {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl SqliteCache {
    /// Open (or create) the cache database at `path`
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| CacheError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        debug!("Opened cache database at {:?}", path);
        Self::from_connection(conn, clock)
    }

    /// Open a cache that lives only as long as this value
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> CacheResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, clock)
    }

    fn from_connection(conn: Connection, clock: Arc<dyn Clock>) -> CacheResult<Self> {
        if needs_init(&conn) {
            init_schema(&conn)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy (default: 3 retries, 500ms apart)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Number of cached articles
    pub fn article_count(&self) -> CacheResult<usize> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn replace_articles(&self, articles: &[Article]) -> CacheResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM articles", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO articles (id, position, body) VALUES (?1, ?2, ?3)")?;
            for (position, article) in articles.iter().enumerate() {
                let body = encode(&article.id, article)?;
                stmt.execute(params![article.id, position as i64, body])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn read_articles(&self) -> CacheResult<Option<Vec<Article>>> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT id, body FROM articles ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut articles = Vec::new();
        for row in rows {
            let (id, body) = row?;
            articles.push(decode(&id, &body)?);
        }

        Ok(if articles.is_empty() {
            None
        } else {
            Some(articles)
        })
    }

    fn write_config(&self, config: &SiteConfig) -> CacheResult<()> {
        let body = encode(SITE_CONFIG_KEY, config)?;
        self.lock().execute(
            "INSERT OR REPLACE INTO config (key, body) VALUES (?1, ?2)",
            params![SITE_CONFIG_KEY, body],
        )?;
        Ok(())
    }

    fn read_config(&self) -> CacheResult<Option<SiteConfig>> {
        let body: Option<String> = self
            .lock()
            .query_row(
                "SELECT body FROM config WHERE key = ?1",
                [SITE_CONFIG_KEY],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| decode(SITE_CONFIG_KEY, &body)).transpose()
    }
}

#[async_trait]
impl LocalCache for SqliteCache {
    async fn save_articles(&self, articles: &[Article]) -> CacheResult<()> {
        self.retry
            .run(self.clock.as_ref(), "save_articles", || async move {
                self.replace_articles(articles)
            })
            .await?;
        debug!("Cached {} articles", articles.len());
        Ok(())
    }

    async fn load_articles(&self) -> CacheResult<Option<Vec<Article>>> {
        self.retry
            .run(self.clock.as_ref(), "load_articles", || async move {
                self.read_articles()
            })
            .await
    }

    async fn save_config(&self, config: &SiteConfig) -> CacheResult<()> {
        self.retry
            .run(self.clock.as_ref(), "save_config", || async move {
                self.write_config(config)
            })
            .await
    }

    async fn load_config(&self) -> CacheResult<Option<SiteConfig>> {
        self.retry
            .run(self.clock.as_ref(), "load_config", || async move {
                self.read_config()
            })
            .await
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> CacheResult<String> {
    serde_json::to_string(value).map_err(|source| CacheError::Encode {
        key: key.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(key: &str, body: &str) -> CacheResult<T> {
    serde_json::from_str(body).map_err(|source| CacheError::CorruptRecord {
        key: key.to_string(),
        source,
    })
}
