//! Travel Guru Core Library
//!
//! This crate provides the core functionality for Travel Guru, a travel
//! magazine whose articles live in a cloud document store and are mirrored
//! into a local cache.
//!
//! # Architecture
//!
//! - **Remote store**: canonical article collection (Firestore over REST)
//! - **Local cache**: SQLite mirror of the last known good remote state
//! - **Defaults**: bundled seed articles used when both sources are empty
//!
//! The [`SyncCoordinator`] owns the in-memory article list and is the only
//! component that mutates it. Rendering ([`markdown`]) and querying
//! ([`search`], [`catalog`]) work on read-only slices.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut sync = SyncCoordinator::open(&config)?;
//! sync.load().await;
//!
//! let hits = search::search(sync.articles(), "kyoto");
//! let rendered = markdown::render_article(&hits[0]);
//! ```
//!
//! # Modules
//!
//! - `sync`: Load/write protocols across remote store and cache (main entry point)
//! - `models`: Article, Category, Intel and SiteConfig
//! - `storage`: Local SQLite cache with bounded retries
//! - `remote`: Remote document store clients
//! - `markdown`: Article body segmentation and lead extraction
//! - `search`: Substring search and highlighting
//! - `catalog`: Feed, category browsing and related articles
//! - `ingest`: Third-party article submission
//! - `config`: Application configuration

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod ingest;
pub mod markdown;
pub mod models;
pub mod remote;
pub mod search;
pub mod slug;
pub mod storage;
pub mod sync;
pub mod toast;

pub use auth::{AdminGate, AuthError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, RemoteCredentials};
pub use ingest::{IngestError, IngestReceipt, IngestRequest, Ingestor};
pub use models::{Article, Category, CategoryFilter, Intel, ServerTimestamp, SiteConfig};
pub use remote::{MemoryRemote, OfflineRemote, RemoteError, RemoteStore};
pub use slug::slugify;
pub use storage::{CacheError, LocalCache, RetryPolicy, SqliteCache};
pub use sync::{LoadSource, SyncCoordinator, SyncError};
pub use toast::{Severity, Toast, ToastQueue};
