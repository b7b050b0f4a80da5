//! # Daily Order Counter
//!
//! Order numbers restart at 1 every day. This module is the arithmetic;
//! `slice-db` stores the last value.
//!
//! ```text
//! stored               today         next
//! ─────────────────    ──────────    ───────────────────
//! none                 2026-10-18    (2026-10-18, 1)
//! (2026-10-18, 41)     2026-10-18    (2026-10-18, 42)
//! (2026-10-17, 97)     2026-10-18    (2026-10-18, 1)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The last number handed out and the day it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounter {
    pub date: NaiveDate,
    pub number: u32,
}

impl DailyCounter {
    /// The counter value after taking one more number on `today`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use slice_core::counter::DailyCounter;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    /// let first = DailyCounter::next_for(None, today);
    /// assert_eq!(first.number, 1);
    /// assert_eq!(DailyCounter::next_for(Some(first), today).number, 2);
    /// ```
    pub fn next_for(previous: Option<DailyCounter>, today: NaiveDate) -> DailyCounter {
        let number = match previous {
            Some(prev) if prev.date == today => prev.number.saturating_add(1),
            _ => 1,
        };
        DailyCounter {
            date: today,
            number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_same_day_increments() {
        let prev = DailyCounter {
            date: day(18),
            number: 41,
        };
        assert_eq!(DailyCounter::next_for(Some(prev), day(18)).number, 42);
    }

    #[test]
    fn test_new_day_resets() {
        let prev = DailyCounter {
            date: day(17),
            number: 97,
        };
        let next = DailyCounter::next_for(Some(prev), day(18));
        assert_eq!(next, DailyCounter { date: day(18), number: 1 });
    }
}
