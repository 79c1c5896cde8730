//! Session event and bonus models.
//!
//! A [`SessionEvent`] is the immutable fact that a class actually started;
//! the earliest event per (student, date) supplies the actual start time for
//! lateness evaluation, and the absence of any event on a scheduled day is
//! the absence signal.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A timestamped fact that a class started for a (teacher, student) pair.
///
/// Session events are appended by the session-tracking subsystem and are
/// immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// The teacher who held the session.
    pub teacher_id: String,
    /// The student the session was held for.
    pub student_id: String,
    /// When the session started.
    pub started_at: NaiveDateTime,
}

impl SessionEvent {
    /// Returns the calendar date the session started on.
    pub fn date(&self) -> NaiveDate {
        self.started_at.date()
    }
}

/// A bonus granted to a teacher, added verbatim to net salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRecord {
    /// The teacher the bonus was granted to.
    pub teacher_id: String,
    /// The date the bonus applies to.
    pub date: NaiveDate,
    /// The bonus amount.
    pub amount: Decimal,
    /// Why the bonus was granted.
    #[serde(default)]
    pub description: String,
}
