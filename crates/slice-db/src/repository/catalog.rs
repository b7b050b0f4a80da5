//! # Catalog Document Repository
//!
//! The menu lives in one row as a JSON document:
//!
//! ```text
//! catalog_document
//! ┌──────┬──────────────────────────────────────────────┬──────────────────────┐
//! │ id   │ body                                         │ updated_at           │
//! ├──────┼──────────────────────────────────────────────┼──────────────────────┤
//! │ main │ {"pizzas":[..],"bebidas":[..],"telefono":..} │ 2026-10-18T20:14:03Z │
//! └──────┴──────────────────────────────────────────────┴──────────────────────┘
//! ```
//!
//! Reads and writes are always wholesale. Legacy bodies (numeric prices,
//! a single `precio` field, a numeric phone) are normalized by the
//! `slice-core` catalog model on the way in.

use chrono::Utc;
use slice_core::catalog::Catalog;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Row id of the single catalog document.
pub const CATALOG_DOCUMENT_ID: &str = "main";

#[derive(Debug, FromRow)]
struct CatalogDocumentRow {
    body: String,
    updated_at: String,
}

/// Repository for the catalog document.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Reads the stored document.
    ///
    /// ## Returns
    /// * `Ok(Some(catalog))` - a document exists (it may still be empty)
    /// * `Ok(None)` - nothing has ever been saved
    /// * `Err(_)` - the database is unreachable or the body is not JSON
    pub async fn load_document(&self) -> DbResult<Option<Catalog>> {
        let row: Option<CatalogDocumentRow> =
            sqlx::query_as("SELECT body, updated_at FROM catalog_document WHERE id = ?1")
                .bind(CATALOG_DOCUMENT_ID)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            debug!("No catalog document stored yet");
            return Ok(None);
        };

        let catalog: Catalog = serde_json::from_str(&row.body)?;
        debug!(
            items = catalog.items.len(),
            beverages = catalog.beverages.len(),
            updated_at = %row.updated_at,
            "Catalog document loaded"
        );
        Ok(Some(catalog))
    }

    /// Replaces the stored document with `catalog`.
    pub async fn save_document(&self, catalog: &Catalog) -> DbResult<()> {
        let body = serde_json::to_string(catalog)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO catalog_document (id, body, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(CATALOG_DOCUMENT_ID)
        .bind(&body)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(bytes = body.len(), "Catalog document saved");
        Ok(())
    }
}
