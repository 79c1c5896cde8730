//! Waiver and materialized deduction record models.
//!
//! A [`Waiver`] is an administrative override that zeroes matching
//! deductions. A [`DeductionRecord`] is a persisted deduction outcome that a
//! waiver can be applied against after the fact; waived records keep their
//! original amount, reason, and timestamp so compensation history stays
//! reconstructible.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of deduction a waiver or record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    /// A lateness deduction (tiered, percentage of the package base).
    Lateness,
    /// An absence deduction (flat package base amount).
    Absence,
}

impl std::fmt::Display for DeductionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeductionType::Lateness => write!(f, "lateness"),
            DeductionType::Absence => write!(f, "absence"),
        }
    }
}

/// An administrative exemption from deductions of one type over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waiver {
    /// The teacher the waiver applies to.
    pub teacher_id: String,
    /// Which deduction type is waived.
    pub deduction_type: DeductionType,
    /// First day covered (inclusive).
    pub start_date: NaiveDate,
    /// Last day covered (inclusive).
    pub end_date: NaiveDate,
    /// Why the waiver was granted. Retained for auditability.
    pub reason: String,
}

impl Waiver {
    /// Returns true if this waiver exempts the given teacher, date, and
    /// deduction type.
    pub fn covers(&self, teacher_id: &str, date: NaiveDate, deduction_type: DeductionType) -> bool {
        self.teacher_id == teacher_id
            && self.deduction_type == deduction_type
            && date >= self.start_date
            && date <= self.end_date
    }
}

/// Review state of a materialized deduction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Awaiting administrative review.
    Pending,
    /// Reviewed and upheld.
    Approved,
    /// Reviewed and rejected.
    Rejected,
}

/// A persisted deduction outcome for one (teacher, student, date).
///
/// Records are produced by absence detection (and may be created for
/// lateness by the surrounding system); they are adjusted in place when a
/// waiver is applied, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// The teacher the deduction applies to.
    pub teacher_id: String,
    /// The student whose slot the deduction arose from.
    pub student_id: String,
    /// Which kind of deduction this is.
    pub deduction_type: DeductionType,
    /// The day of the missed or late class.
    pub date: NaiveDate,
    /// The scheduled time-of-day of the affected slot, if known.
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
    /// The current deduction amount. Zero once waived.
    pub amount: Decimal,
    /// Whether the absence was administratively permitted.
    pub permitted: bool,
    /// Review state of the record.
    pub review_state: ReviewState,
    /// The amount before a waiver zeroed it.
    #[serde(default)]
    pub original_amount: Option<Decimal>,
    /// The waiver reason, when a waiver has been applied.
    #[serde(default)]
    pub waiver_reason: Option<String>,
    /// When the waiver was applied.
    #[serde(default)]
    pub waived_at: Option<DateTime<Utc>>,
}

impl DeductionRecord {
    /// Returns true if a waiver has already been applied to this record.
    pub fn is_waived(&self) -> bool {
        self.waived_at.is_some()
    }
}
