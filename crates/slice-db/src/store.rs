//! # Catalog Store
//!
//! Where the counter gets its menu from, and where admin edits go.
//!
//! ## Load Fallback Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CatalogStore::load()                            │
//! │                                                                         │
//! │  1. catalog_document (SQLite)                                          │
//! │       │  has items or drinks? ──yes──► refresh cache ──► Primary       │
//! │       │  empty / missing / error                                        │
//! │       ▼                                                                 │
//! │  2. Local cache files                                                  │
//! │       │  anything there? ──yes──────────────────────────► Cache        │
//! │       │  nothing                                                        │
//! │       ▼                                                                 │
//! │  3. Seed defaults ──────────────────────────────────────► Defaults     │
//! │                                                                         │
//! │  Primary and Cache results are completed with `fill_missing`, so the   │
//! │  counter always has at least one item and a phone number.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Save
//! The primary write is attempted first; the cache is written whatever the
//! outcome. A failed primary write is a warning, never an error: the edit
//! stays in memory and in the cache.
//!
//! ## Order Numbers
//! ```text
//! next_order_number(today)
//!     │
//!     ├── database counter ok ──► mirror into the cache counter file
//!     │
//!     └── no database / counter error ──► cache counter file
//! ```

use chrono::NaiveDate;
use slice_core::catalog::Catalog;
use slice_core::counter::DailyCounter;
use tracing::{error, info, warn};

use crate::cache::LocalCache;
use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// Which source a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Primary,
    Cache,
    Defaults,
}

/// Result of [`CatalogStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub source: CatalogSource,
}

/// Result of [`CatalogStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored in the database and the cache.
    Saved,
    /// The database write failed. The cache may still have it.
    Degraded { reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Primary database plus local cache, with the fallback rules above.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    /// `None` when the database could not be opened at startup.
    db: Option<Database>,
    cache: LocalCache,
    default_phone: String,
}

impl CatalogStore {
    pub fn new(db: Database, cache: LocalCache, default_phone: impl Into<String>) -> Self {
        CatalogStore {
            db: Some(db),
            cache,
            default_phone: default_phone.into(),
        }
    }

    /// A store with no database: loads come from the cache, saves degrade.
    pub fn offline(cache: LocalCache, default_phone: impl Into<String>) -> Self {
        CatalogStore {
            db: None,
            cache,
            default_phone: default_phone.into(),
        }
    }

    pub fn database(&self) -> Option<&Database> {
        self.db.as_ref()
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Loads the catalog. Never fails: the last resort is the seed menu.
    pub async fn load(&self) -> LoadedCatalog {
        let primary = match &self.db {
            Some(db) => db.catalog().load_document().await,
            None => Err(DbError::ConnectionFailed("Database not open".to_string())),
        };

        match primary {
            Ok(Some(mut catalog)) if !(catalog.items.is_empty() && catalog.beverages.is_empty()) => {
                catalog.fill_missing(&self.default_phone);
                if let Err(e) = self.cache.write(&catalog) {
                    warn!(error = %e, "Could not refresh the local cache");
                }
                info!(
                    items = catalog.items.len(),
                    beverages = catalog.beverages.len(),
                    "Catalog loaded from database"
                );
                return LoadedCatalog {
                    catalog,
                    source: CatalogSource::Primary,
                };
            }
            Ok(_) => info!("Database catalog is empty, trying the local cache"),
            Err(e) => warn!(error = %e, "Database catalog unavailable, trying the local cache"),
        }

        if let Some(mut catalog) = self.cache.read() {
            catalog.fill_missing(&self.default_phone);
            info!(
                items = catalog.items.len(),
                beverages = catalog.beverages.len(),
                "Catalog loaded from local cache"
            );
            return LoadedCatalog {
                catalog,
                source: CatalogSource::Cache,
            };
        }

        info!("No stored catalog, starting from the default menu");
        LoadedCatalog {
            catalog: Catalog::seed_defaults(&self.default_phone),
            source: CatalogSource::Defaults,
        }
    }

    /// Writes `catalog` to the database and the cache.
    pub async fn save(&self, catalog: &Catalog) -> SaveOutcome {
        let primary = match &self.db {
            Some(db) => db.catalog().save_document(catalog).await,
            None => Err(DbError::ConnectionFailed("Database not open".to_string())),
        };

        let outcome = match primary {
            Ok(()) => {
                info!("Catalog saved");
                SaveOutcome::Saved
            }
            Err(e) => {
                error!(error = %e, "Catalog save failed, keeping local copy");
                SaveOutcome::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(e) = self.cache.write(catalog) {
            warn!(error = %e, "Could not write the local cache");
        }

        outcome
    }

    /// Takes the next daily order number.
    ///
    /// The database counter is the source of truth; the cache counter file
    /// follows it and numbers orders while the database is out. Fails only
    /// when neither can be written.
    pub async fn next_order_number(&self, today: NaiveDate) -> DbResult<u32> {
        if let Some(db) = &self.db {
            match db.order_counter().next_order_number(today).await {
                Ok(number) => {
                    let mirror = DailyCounter { date: today, number };
                    if let Err(e) = self.cache.write_counter(&mirror) {
                        warn!(error = %e, "Could not mirror the order counter to the cache");
                    }
                    return Ok(number);
                }
                Err(e) => warn!(error = %e, "Order counter unavailable, numbering from the cache"),
            }
        }

        self.cache.next_order_number(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use slice_core::DEFAULT_PHONE;

    fn temp_cache(name: &str) -> LocalCache {
        let dir = std::env::temp_dir().join(format!("slice-store-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        LocalCache::new(dir)
    }

    async fn store(name: &str) -> CatalogStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogStore::new(db, temp_cache(name), DEFAULT_PHONE)
    }

    #[tokio::test]
    async fn test_fresh_install_uses_defaults() {
        let store = store("fresh").await;
        let loaded = store.load().await;

        assert_eq!(loaded.source, CatalogSource::Defaults);
        assert_eq!(loaded.catalog, Catalog::seed_defaults(DEFAULT_PHONE));
    }

    #[tokio::test]
    async fn test_saved_catalog_loads_from_primary_and_refreshes_cache() {
        let store = store("primary").await;
        let mut catalog = Catalog::seed_defaults("5491111111111");
        catalog.add_beverage("Cola", "1500").unwrap();

        assert_eq!(store.save(&catalog).await, SaveOutcome::Saved);

        let loaded = store.load().await;
        assert_eq!(loaded.source, CatalogSource::Primary);
        assert_eq!(loaded.catalog, catalog);
        assert_eq!(store.cache.read(), Some(catalog));

        let _ = std::fs::remove_dir_all(store.cache.dir());
    }

    #[tokio::test]
    async fn test_primary_with_only_drinks_gets_seed_items() {
        let store = store("drinks-only").await;
        let mut catalog = Catalog::default();
        catalog.add_beverage("Agua", "900").unwrap();
        store.save(&catalog).await;

        let loaded = store.load().await;
        assert_eq!(loaded.source, CatalogSource::Primary);
        assert_eq!(loaded.catalog.items.len(), 2);
        assert_eq!(loaded.catalog.phone, DEFAULT_PHONE);

        let _ = std::fs::remove_dir_all(store.cache.dir());
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back_to_cache() {
        let store = store("empty-primary").await;
        let cached = Catalog::seed_defaults("5492222222222");
        store.cache.write(&cached).unwrap();
        store
            .database()
            .unwrap()
            .catalog()
            .save_document(&Catalog::default())
            .await
            .unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.source, CatalogSource::Cache);
        assert_eq!(loaded.catalog.phone, "5492222222222");

        let _ = std::fs::remove_dir_all(store.cache.dir());
    }

    #[tokio::test]
    async fn test_unreachable_primary_degrades_save_and_loads_cache() {
        let store = store("unreachable").await;
        store.database().unwrap().close().await;

        let mut catalog = Catalog::seed_defaults(DEFAULT_PHONE);
        catalog.add_beverage("Cola", "1500").unwrap();

        let outcome = store.save(&catalog).await;
        assert!(matches!(outcome, SaveOutcome::Degraded { .. }));
        assert!(!outcome.is_saved());

        let loaded = store.load().await;
        assert_eq!(loaded.source, CatalogSource::Cache);
        assert_eq!(loaded.catalog, catalog);

        let _ = std::fs::remove_dir_all(store.cache.dir());
    }

    #[tokio::test]
    async fn test_order_numbers_continue_from_cache_when_database_drops() {
        let store = store("numbers").await;
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        assert_eq!(store.next_order_number(today).await.unwrap(), 1);
        assert_eq!(store.next_order_number(today).await.unwrap(), 2);

        store.database().unwrap().close().await;
        assert_eq!(store.next_order_number(today).await.unwrap(), 3);

        let offline = CatalogStore::offline(store.cache().clone(), DEFAULT_PHONE);
        assert_eq!(offline.next_order_number(today).await.unwrap(), 4);

        let _ = std::fs::remove_dir_all(store.cache().dir());
    }

    #[tokio::test]
    async fn test_offline_store_reads_cache_and_degrades() {
        let cache = temp_cache("offline");
        let cached = Catalog::seed_defaults("5493333333333");
        cache.write(&cached).unwrap();

        let store = CatalogStore::offline(cache, DEFAULT_PHONE);
        let loaded = store.load().await;
        assert_eq!(loaded.source, CatalogSource::Cache);
        assert_eq!(loaded.catalog, cached);

        assert!(!store.save(&cached).await.is_saved());

        let _ = std::fs::remove_dir_all(store.cache.dir());
    }
}
