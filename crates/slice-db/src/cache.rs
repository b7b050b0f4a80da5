//! # Local Fallback Cache
//!
//! A copy of the last known catalog kept on the local disk, used when the
//! database can't be read or holds nothing.
//!
//! ```text
//! <cache dir>/
//! ├── menu_items_cache.json       [ {"nombre": .., "precioEntera": ..}, .. ]
//! ├── menu_beverages_cache.json   [ {"nombre": .., "precio": ..}, .. ]
//! ├── contact_phone_cache.json    "5490000000000"
//! └── order_counter_cache.json    {"date": "2026-10-18", "number": 41}
//! ```
//!
//! Each file is read on its own: a missing or unreadable file only loses
//! its own part of the catalog. The counter file mirrors the database
//! counter and takes over numbering when the database can't.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use slice_core::catalog::{BeverageItem, Catalog, CatalogItem};
use slice_core::counter::DailyCounter;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::DbResult;

pub const ITEMS_FILE: &str = "menu_items_cache.json";
pub const BEVERAGES_FILE: &str = "menu_beverages_cache.json";
pub const PHONE_FILE: &str = "contact_phone_cache.json";
pub const COUNTER_FILE: &str = "order_counter_cache.json";

/// The cache files under one directory.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads whatever the cache holds.
    ///
    /// Returns `None` when all three parts are missing or empty.
    pub fn read(&self) -> Option<Catalog> {
        let items: Vec<CatalogItem> = self.read_part(ITEMS_FILE).unwrap_or_default();
        let beverages: Vec<BeverageItem> = self.read_part(BEVERAGES_FILE).unwrap_or_default();
        let phone = self
            .read_part::<Value>(PHONE_FILE)
            .map(|value| match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            })
            .unwrap_or_default();

        let catalog = Catalog {
            items,
            beverages,
            phone,
        };

        if catalog.is_empty() {
            debug!(dir = %self.dir.display(), "Cache is empty");
            None
        } else {
            debug!(
                items = catalog.items.len(),
                beverages = catalog.beverages.len(),
                "Catalog read from cache"
            );
            Some(catalog)
        }
    }

    /// Overwrites all three files with `catalog`.
    pub fn write(&self, catalog: &Catalog) -> DbResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        std::fs::write(
            self.dir.join(ITEMS_FILE),
            serde_json::to_string_pretty(&catalog.items)?,
        )?;
        std::fs::write(
            self.dir.join(BEVERAGES_FILE),
            serde_json::to_string_pretty(&catalog.beverages)?,
        )?;
        std::fs::write(self.dir.join(PHONE_FILE), serde_json::to_string(&catalog.phone)?)?;

        debug!(dir = %self.dir.display(), "Cache written");
        Ok(())
    }

    /// The last order number recorded here, if any.
    pub fn read_counter(&self) -> Option<DailyCounter> {
        self.read_part(COUNTER_FILE)
    }

    /// Records `counter` as the last number handed out.
    pub fn write_counter(&self, counter: &DailyCounter) -> DbResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(COUNTER_FILE), serde_json::to_string(counter)?)?;
        Ok(())
    }

    /// Takes the next daily order number from the counter file.
    pub fn next_order_number(&self, today: NaiveDate) -> DbResult<u32> {
        let next = DailyCounter::next_for(self.read_counter(), today);
        self.write_counter(&next)?;
        debug!(date = %next.date, number = next.number, "Order number taken from cache");
        Ok(next.number)
    }

    fn read_part<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.dir.join(file);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file unreadable");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file is not valid JSON");
                None
            }
        }
    }
}
