//! # App State
//!
//! The catalog, the order in progress and the admin gate, plus the handles
//! needed to persist and export them.

use chrono::NaiveDate;
use slice_core::catalog::{AdminGate, Catalog};
use slice_core::format::OrderFormatter;
use slice_core::session::OrderSession;
use slice_db::{CatalogSource, CatalogStore, Database, DbConfig, LoadedCatalog, LocalCache, SaveOutcome};
use tracing::{info, warn};

use super::config::AppConfig;
use crate::export::ReceiptPrinter;

pub struct AppState {
    pub catalog: Catalog,
    pub session: OrderSession,
    pub admin: AdminGate,
    config: AppConfig,
    catalog_source: CatalogSource,
    store: CatalogStore,
    formatter: OrderFormatter,
    printer: ReceiptPrinter,
}

impl AppState {
    /// Opens storage and loads the catalog.
    ///
    /// Never fails: without a database the store runs offline and the
    /// catalog comes from the cache or the seed menu.
    pub async fn open(config: AppConfig) -> Self {
        let cache = LocalCache::new(config.cache_dir());
        let db_path = config.database_path();

        if let Some(parent) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "Could not create data directory");
            }
        }

        let store = match Database::new(DbConfig::new(&db_path)).await {
            Ok(db) => CatalogStore::new(db, cache, config.store.default_phone.clone()),
            Err(e) => {
                warn!(error = %e, "Database unavailable, running from the local cache");
                CatalogStore::offline(cache, config.store.default_phone.clone())
            }
        };

        let loaded = store.load().await;
        Self::new(config, store, loaded)
    }

    pub fn new(config: AppConfig, store: CatalogStore, loaded: LoadedCatalog) -> Self {
        let session = OrderSession::new(config.pricing_policy(), config.pricing.default_delivery_fee)
            .with_pick_count(config.pricing.promo_pick_count);

        info!(source = ?loaded.source, "Counter state ready");

        AppState {
            catalog: loaded.catalog,
            session,
            admin: AdminGate::new(config.admin.pin.clone()),
            formatter: config.formatter(),
            printer: ReceiptPrinter::new(config.printer.spool_path.clone()),
            catalog_source: loaded.source,
            store,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog_source(&self) -> CatalogSource {
        self.catalog_source
    }

    pub fn formatter(&self) -> &OrderFormatter {
        &self.formatter
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn printer(&self) -> &ReceiptPrinter {
        &self.printer
    }

    /// Persists the current catalog.
    ///
    /// Awaited in place: admin mode is modal, so the loop has nothing else
    /// to do until the write settles (at most the pool's acquire timeout).
    pub async fn save_catalog(&self) -> SaveOutcome {
        self.store.save(&self.catalog).await
    }

    /// Takes the next daily order number from the database counter, or from
    /// the cache counter file when the database is out. `None` only when
    /// neither can be written (the order goes out without a number).
    pub async fn next_order_number(&self, today: NaiveDate) -> Option<u32> {
        match self.store.next_order_number(today).await {
            Ok(number) => Some(number),
            Err(e) => {
                warn!(error = %e, "Order counter unavailable");
                None
            }
        }
    }
}
