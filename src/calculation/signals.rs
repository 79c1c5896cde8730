//! Attendance signal extraction.
//!
//! This module turns a teacher's roster and raw session events into
//! per-student-per-day facts: whether a class was scheduled, at what time,
//! and when (if ever) it actually started. Everything downstream — base pay,
//! lateness, absence — is computed from these signals.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::EngineResult;
use crate::models::{SessionEvent, Student, Teacher};

/// The attendance facts for one student on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDaySignal {
    /// The day the facts are about.
    pub date: NaiveDate,
    /// The student the facts are about.
    pub student_id: String,
    /// The student's package name.
    pub package: String,
    /// The scheduled time-of-day, if one is configured.
    pub scheduled_time: Option<NaiveTime>,
    /// True if the student's weekday pattern includes this date.
    pub scheduled: bool,
    /// Earliest session event of the day, if any.
    pub actual_start: Option<NaiveDateTime>,
    /// True if the student's pattern string was unrecognized and the
    /// permissive every-day default was applied.
    pub pattern_unrecognized: bool,
}

/// Extracts day signals for a single student over an inclusive date range.
///
/// The date range is assumed valid; the public entry point
/// [`daily_signals`] validates it. `sessions` may contain events for other
/// students or teachers; they are ignored.
pub fn student_day_signals(
    student: &Student,
    sessions: &[SessionEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<StudentDaySignal> {
    let pattern = student.pattern();
    let pattern_unrecognized = pattern.is_unrecognized();

    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| {
            let actual_start = sessions
                .iter()
                .filter(|s| s.student_id == student.id && s.date() == date)
                .map(|s| s.started_at)
                .min();

            StudentDaySignal {
                date,
                student_id: student.id.clone(),
                package: student.package.clone(),
                scheduled_time: student.scheduled_time,
                scheduled: pattern.matches(date),
                actual_start,
                pattern_unrecognized,
            }
        })
        .collect()
}

/// Extracts day signals for every active student on a teacher's roster.
///
/// Signals are ordered by student (roster order), then by date ascending.
/// Students whose weekday pattern could not be interpreted are logged as a
/// data-quality signal and treated as scheduled every day; this permissive
/// default is deliberate, so a missing pattern never silently drops
/// lateness or absence evaluation.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidDateRange`] if `from` is
/// after `to`.
pub fn daily_signals(
    teacher: &Teacher,
    sessions: &[SessionEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> EngineResult<Vec<StudentDaySignal>> {
    if from > to {
        return Err(crate::error::EngineError::InvalidDateRange { from, to });
    }

    let mut signals = Vec::new();
    for student in teacher.active_students() {
        if student.pattern().is_unrecognized() {
            warn!(
                teacher_id = %teacher.id,
                student_id = %student.id,
                day_package = %student.day_package,
                "Unrecognized weekday pattern; treating student as scheduled every day"
            );
        }
        signals.extend(student_day_signals(student, sessions, from, to));
    }

    Ok(signals)
}
