//! # Order Counter Repository
//!
//! Hands out the daily order number printed on tickets.
//!
//! ```text
//! next_order_number(today)
//!       │
//!       ▼
//! BEGIN
//!   SELECT date, number FROM order_counter WHERE id = 1
//!   DailyCounter::next_for(stored, today)      ← slice-core
//!   UPSERT (1, today, next)
//! COMMIT
//! ```
//!
//! The transaction covers one pool. Two terminals with separate database
//! files keep separate counters.

use chrono::NaiveDate;
use slice_core::counter::DailyCounter;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, FromRow)]
struct CounterRow {
    date: NaiveDate,
    number: i64,
}

impl CounterRow {
    fn into_counter(self) -> DbResult<DailyCounter> {
        let number = u32::try_from(self.number)
            .map_err(|_| DbError::Internal(format!("Order counter out of range: {}", self.number)))?;
        Ok(DailyCounter {
            date: self.date,
            number,
        })
    }
}

/// Repository for the daily order counter.
#[derive(Debug, Clone)]
pub struct OrderCounterRepository {
    pool: SqlitePool,
}

impl OrderCounterRepository {
    /// Creates a new OrderCounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderCounterRepository { pool }
    }

    /// The last number handed out, if any.
    pub async fn current(&self) -> DbResult<Option<DailyCounter>> {
        let row: Option<CounterRow> =
            sqlx::query_as("SELECT date, number FROM order_counter WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        row.map(CounterRow::into_counter).transpose()
    }

    /// Takes the next order number for `today` and stores it.
    ///
    /// Same day as the stored value → stored + 1. Any other day → 1.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let today = chrono::Local::now().date_naive();
    /// let number = db.order_counter().next_order_number(today).await?;
    /// ```
    pub async fn next_order_number(&self, today: NaiveDate) -> DbResult<u32> {
        let mut tx = self.pool.begin().await?;

        let row: Option<CounterRow> =
            sqlx::query_as("SELECT date, number FROM order_counter WHERE id = 1")
                .fetch_optional(&mut *tx)
                .await?;
        let stored = row.map(CounterRow::into_counter).transpose()?;

        let next = DailyCounter::next_for(stored, today);

        sqlx::query(
            r#"
            INSERT INTO order_counter (id, date, number)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                number = excluded.number
            "#,
        )
        .bind(next.date)
        .bind(i64::from(next.number))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(date = %next.date, number = next.number, "Order number taken");
        Ok(next.number)
    }
}
