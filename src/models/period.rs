//! Calculation period model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive date range over which compensation is calculated.
///
/// Callers may request full months or arbitrary partial ranges; the cache is
/// keyed on both endpoints, so partial-month requests never collide with
/// full-month ones.
///
/// # Example
///
/// ```
/// use comp_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl Period {
    /// Checks that the period is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDateRange`] if the start date is after
    /// the end date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidDateRange {
                from: self.start_date,
                to: self.end_date,
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates every date in the period in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}
