//! Compensation breakdown models.
//!
//! This module contains the [`CompensationBreakdown`] type and its associated
//! structures that capture all outputs from a salary calculation: per-student
//! itemization, deduction lines, totals, and data-quality warnings.
//!
//! The aggregate totals and the itemized lines are produced by the same
//! calculation pass; summing a breakdown's lines always reproduces its
//! totals.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// One day of base pay earned for one student.
///
/// A line exists for every teaching day, i.e. every day on which a session
/// event was recorded for the student. The amount is the student's
/// (unrounded) daily rate, so summing the lines reproduces the student's
/// base pay exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPayLine {
    /// The teaching day.
    pub date: NaiveDate,
    /// The daily-rate contribution for this day.
    pub amount: Decimal,
}

/// One evaluated lateness for one student day.
///
/// Lines are recorded whenever the teacher started late, including excused
/// lateness (zero amount), so reviewers can see why a day did or did not
/// deduct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessLine {
    /// The day the session started late.
    pub date: NaiveDate,
    /// Whole minutes of lateness.
    pub minutes_late: i64,
    /// The tier label ("Excused", "Tier 1", "> Max Tier", ...).
    pub tier: String,
    /// The tier's deduction percentage.
    pub deduction_percent: Decimal,
    /// The deduction amount, rounded to currency precision. Zero if waived.
    pub amount: Decimal,
    /// Whether a waiver zeroed this deduction.
    pub waived: bool,
}

/// One absence deduction for one student day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceLine {
    /// The day the scheduled class did not happen.
    pub date: NaiveDate,
    /// The flat absence deduction amount.
    pub amount: Decimal,
}

/// The per-student itemization of a teacher's compensation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentBreakdown {
    /// The student this itemization is for.
    pub student_id: String,
    /// The student's display name.
    pub student_name: String,
    /// The student's package name.
    pub package: String,
    /// Monthly package rate divided by working days in the period.
    pub daily_rate: Decimal,
    /// True if the package rate was missing; the student then contributes
    /// zero but is still counted and itemized.
    pub rate_missing: bool,
    /// True if the student's weekday pattern string was unrecognized and the
    /// permissive every-day default was applied.
    pub pattern_unrecognized: bool,
    /// One line per teaching day (day with a session event).
    pub teaching_days: Vec<DailyPayLine>,
    /// Base pay contribution: daily rate summed over teaching days,
    /// unrounded.
    pub base_pay: Decimal,
    /// Evaluated lateness lines.
    pub lateness: Vec<LatenessLine>,
    /// Sum of lateness line amounts.
    pub lateness_total: Decimal,
    /// Absence deduction lines.
    pub absences: Vec<AbsenceLine>,
    /// Sum of absence line amounts.
    pub absence_total: Decimal,
}

/// A data-quality warning attached to a breakdown.
///
/// Warnings flag anomalies that did not prevent calculation but deserve
/// attention, such as a missing package rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete compensation result for one teacher over one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationBreakdown {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The policy version the calculation was made under.
    pub policy_version: String,
    /// The teacher the calculation is for.
    pub teacher_id: String,
    /// The teacher's display name.
    pub teacher_name: String,
    /// The period the calculation covers.
    pub period: Period,
    /// Working days in the period under the Sunday-inclusion rule.
    pub working_days: u32,
    /// Per-student itemization.
    pub students: Vec<StudentBreakdown>,
    /// Number of students included (equals `students.len()`, kept explicit
    /// for consumers that drop the itemization).
    pub student_count: usize,
    /// Total base salary, rounded to currency precision.
    pub base_salary: Decimal,
    /// Total lateness deductions.
    pub lateness_total: Decimal,
    /// Total absence deductions.
    pub absence_total: Decimal,
    /// Total bonuses, added verbatim.
    pub bonus_total: Decimal,
    /// base - lateness - absence + bonuses. May be negative; flooring at
    /// zero is the consumer's policy decision.
    pub net_salary: Decimal,
    /// Data-quality warnings raised during the calculation.
    pub warnings: Vec<CalculationWarning>,
}

/// A per-teacher failure inside a batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// The teacher whose calculation failed.
    pub teacher_id: String,
    /// The failure message.
    pub message: String,
}

/// Summary of a batch calculation over many teachers.
///
/// A single teacher's failure never aborts the batch; it is recorded here
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Teachers calculated successfully.
    pub processed: usize,
    /// Teachers that failed.
    pub errored: usize,
    /// The individual failures.
    pub errors: Vec<BatchError>,
}
