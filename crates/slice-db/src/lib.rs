//! # slice-db: Storage Layer for Slice POS
//!
//! Everything the counter persists: the menu document, its local fallback
//! copy and the daily order counter.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Slice POS Data Flow                              │
//! │                                                                         │
//! │  apps/counter (startup, admin save, checkout)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     slice-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CatalogStore  │    │   Database    │    │  LocalCache  │  │   │
//! │  │   │  (store.rs)   │───►│   (pool.rs)   │    │  (cache.rs)  │  │   │
//! │  │   │               │    │ CatalogRepo   │    │ 4 JSON files │  │   │
//! │  │   │ load / save   │───►│ CounterRepo   │    │              │  │   │
//! │  │   │ fallbacks     │────┼───────────────┼───►│              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (slice.db, WAL)        <cache dir>/*.json                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Catalog document and order counter repositories
//! - [`cache`] - Local fallback cache files
//! - [`store`] - Load fallback chain, degraded saves, order numbering
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slice_db::{CatalogStore, Database, DbConfig, LocalCache};
//!
//! let db = Database::new(DbConfig::new("slice.db")).await?;
//! let store = CatalogStore::new(db.clone(), LocalCache::new("cache"), "5490000000000");
//!
//! let loaded = store.load().await;
//! let number = store.next_order_number(today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::LocalCache;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{CatalogSource, CatalogStore, LoadedCatalog, SaveOutcome};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::counter::OrderCounterRepository;
