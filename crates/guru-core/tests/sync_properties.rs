//! End-to-end behaviour of the sync coordinator over a real SQLite cache

use std::sync::Arc;

use guru_core::defaults;
use guru_core::markdown::{self, Block, Inline};
use guru_core::search::{self, Segment};
use guru_core::storage::LocalCache;
use guru_core::{
    Article, Clock, LoadSource, ManualClock, MemoryRemote, SqliteCache, SyncCoordinator,
};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    remote: Arc<MemoryRemote>,
    cache: Arc<SqliteCache>,
    sync: SyncCoordinator,
}

impl Fixture {
    fn new(remote: MemoryRemote) -> Self {
        let dir = TempDir::new().unwrap();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let cache = Arc::new(SqliteCache::open(&dir.path().join("cache.db"), clock.clone()).unwrap());
        let remote = Arc::new(remote);
        let sync = SyncCoordinator::new(remote.clone(), cache.clone(), clock);
        Self {
            _dir: dir,
            remote,
            cache,
            sync,
        }
    }
}

fn article(id: &str, title: &str) -> Article {
    let mut article = Article::with_id(id, title);
    article.location = "KYOTO, JAPAN".to_string();
    article.content = "Temples at dawn.".to_string();
    article
}

#[tokio::test]
async fn remote_articles_win_over_cache_and_defaults() {
    let remote = MemoryRemote::with_articles(vec![article("r1", "Remote One"), article("r2", "Remote Two")]);
    let mut fx = Fixture::new(remote);
    fx.cache
        .save_articles(&[article("c1", "Cached")])
        .await
        .unwrap();

    assert_eq!(fx.sync.load().await, LoadSource::Remote);
    assert_eq!(fx.sync.articles(), fx.remote.snapshot().as_slice());
}

#[tokio::test]
async fn cache_then_defaults_when_remote_is_empty() {
    let mut fx = Fixture::new(MemoryRemote::new());
    assert_eq!(fx.sync.load().await, LoadSource::Defaults);
    assert_eq!(fx.sync.articles(), defaults::articles().as_slice());

    let cached = vec![article("c1", "Cached One"), article("c2", "Cached Two")];
    fx.cache.save_articles(&cached).await.unwrap();
    assert_eq!(fx.sync.load().await, LoadSource::LocalCache);
    assert_eq!(fx.sync.articles(), cached.as_slice());
}

#[tokio::test]
async fn failed_remote_writes_leave_memory_and_cache_untouched() {
    let remote = MemoryRemote::with_articles(vec![article("r1", "Remote One")]);
    let mut fx = Fixture::new(remote);
    fx.sync.load().await;
    fx.sync.add_article(article("r2", "Remote Two")).await.unwrap();

    let memory_before = fx.sync.articles().to_vec();
    let cache_before = fx.cache.load_articles().await.unwrap();
    fx.remote.set_failing(true);

    assert!(fx.sync.add_article(article("r3", "Three")).await.is_err());
    let mut edited = memory_before[1].clone();
    edited.title = "Edited".to_string();
    assert!(fx.sync.update_article(edited).await.is_err());
    assert!(fx.sync.delete_article("r1").await.is_err());

    assert_eq!(fx.sync.articles(), memory_before.as_slice());
    assert_eq!(fx.cache.load_articles().await.unwrap(), cache_before);
}

#[tokio::test]
async fn seed_articles_cannot_be_deleted() {
    let mut fx = Fixture::new(MemoryRemote::with_articles(defaults::articles()));
    fx.sync.load().await;
    let before = fx.sync.articles().to_vec();

    for id in defaults::SEED_IDS {
        assert!(fx.sync.delete_article(id).await.is_err());
    }

    assert_eq!(fx.remote.delete_calls(), 0);
    assert_eq!(fx.sync.articles(), before.as_slice());
}

#[tokio::test]
async fn reload_is_idempotent() {
    let mut fx = Fixture::new(MemoryRemote::with_articles(vec![article("r1", "One")]));
    fx.sync.load().await;
    let first = fx.sync.articles().to_vec();
    fx.sync.load().await;
    assert_eq!(fx.sync.articles(), first.as_slice());
}

#[tokio::test]
async fn loaded_articles_render_and_search() {
    let mut post = article("r1", "Night Walks");
    post.content =
        "# Title\n\n*This is the lead.*\n\n## Section\n\nBody text with **bold** and *italic*."
            .to_string();
    let mut fx = Fixture::new(MemoryRemote::with_articles(vec![post]));
    fx.sync.load().await;

    let rendered = markdown::render_article(&fx.sync.articles()[0]);
    assert_eq!(rendered.lead.as_deref(), Some("This is the lead."));
    assert_eq!(
        rendered.blocks,
        vec![
            Block::Heading {
                level: 2,
                content: vec![Inline::Text("Section".to_string())],
            },
            Block::Paragraph {
                content: vec![
                    Inline::Text("Body text with ".to_string()),
                    Inline::Strong("bold".to_string()),
                    Inline::Text(" and ".to_string()),
                    Inline::Emphasis("italic".to_string()),
                    Inline::Text(".".to_string()),
                ],
            },
        ]
    );

    let hits = search::search(fx.sync.articles(), "KYOTO");
    assert_eq!(hits.len(), 1);
    assert!(search::search(fx.sync.articles(), "").is_empty());
    assert_eq!(
        search::highlight("KYOTO, JAPAN", "kyoto"),
        vec![Segment::Match("KYOTO"), Segment::Plain(", JAPAN")]
    );
}
