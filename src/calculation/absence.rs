//! Absence detection.
//!
//! Decides, per student per day, whether a scheduled class that never
//! started counts as an absence and what it deducts. A day is either
//! late-but-present or absent, never both: lateness is evaluated only for
//! days with a session event, absence only for days without one.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::round_currency;
use super::signals::{daily_signals, StudentDaySignal};
use super::waivers::find_waiver;
use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionType, SessionEvent, Teacher, Waiver};
use crate::policy::Policy;

/// Why a day was or was not counted as an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// The day has not elapsed yet; absence is never evaluated for today
    /// or future dates.
    NotYetElapsed,
    /// The date is a Sunday and Sundays are excluded by policy.
    SundayExcluded,
    /// The date's month is not in the absence-effective-months list.
    MonthNotEffective,
    /// No class was expected on this day.
    NotScheduled,
    /// A waiver exempts this teacher, date, and deduction type.
    Waived,
    /// A session event exists; the class happened.
    Present,
    /// The class was scheduled and never started.
    Absent,
}

impl std::fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsenceReason::NotYetElapsed => write!(f, "Day not elapsed"),
            AbsenceReason::SundayExcluded => write!(f, "Sunday excluded"),
            AbsenceReason::MonthNotEffective => write!(f, "Month not effective"),
            AbsenceReason::NotScheduled => write!(f, "Not scheduled"),
            AbsenceReason::Waived => write!(f, "Waived"),
            AbsenceReason::Present => write!(f, "Present"),
            AbsenceReason::Absent => write!(f, "Absent"),
        }
    }
}

/// The absence decision for one student on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceOutcome {
    /// The student the decision is about.
    pub student_id: String,
    /// The day the decision is about.
    pub date: NaiveDate,
    /// The scheduled time-of-day of the affected slot, if known.
    pub scheduled_time: Option<NaiveTime>,
    /// True if the day counts as an absence.
    pub is_absent: bool,
    /// Why the day was or was not counted.
    pub reason: AbsenceReason,
    /// The flat deduction amount; zero unless absent.
    pub deduction: Decimal,
    /// The waiver reason, when a waiver suppressed the absence.
    pub waiver_reason: Option<String>,
}

/// Evaluates absence for one student day.
///
/// Rules, in order: the day must be strictly before `today`; Sundays are
/// skipped when the policy excludes them; months outside the effective list
/// are skipped; unscheduled days are skipped; a matching waiver suppresses
/// the absence; otherwise the day is absent iff it has no session event,
/// deducting the flat `absence_base`.
///
/// Suppression rules compose: a Sunday outside the effective months is
/// reported with the Sunday reason (first match wins) and deducts nothing
/// either way.
pub fn compute_absence(
    signal: &StudentDaySignal,
    policy: &Policy,
    absence_base: Decimal,
    waiver: Option<&Waiver>,
    today: NaiveDate,
) -> AbsenceOutcome {
    let mut outcome = AbsenceOutcome {
        student_id: signal.student_id.clone(),
        date: signal.date,
        scheduled_time: signal.scheduled_time,
        is_absent: false,
        reason: AbsenceReason::Present,
        deduction: Decimal::ZERO,
        waiver_reason: None,
    };

    if signal.date >= today {
        outcome.reason = AbsenceReason::NotYetElapsed;
        return outcome;
    }

    if !policy.include_sundays() && signal.date.weekday() == Weekday::Sun {
        outcome.reason = AbsenceReason::SundayExcluded;
        return outcome;
    }

    if !policy.month_effective(signal.date.month()) {
        outcome.reason = AbsenceReason::MonthNotEffective;
        return outcome;
    }

    if !signal.scheduled {
        outcome.reason = AbsenceReason::NotScheduled;
        return outcome;
    }

    if let Some(waiver) = waiver {
        outcome.reason = AbsenceReason::Waived;
        outcome.waiver_reason = Some(waiver.reason.clone());
        return outcome;
    }

    if signal.actual_start.is_none() {
        outcome.is_absent = true;
        outcome.reason = AbsenceReason::Absent;
        outcome.deduction = round_currency(absence_base);
    }

    outcome
}

/// Evaluates absences for every active student of one teacher on one day.
///
/// Used by the periodic scheduler to materialize deduction records. Each
/// student is evaluated independently; a teacher can be absent for some
/// students and present for others on the same date.
///
/// # Errors
///
/// Returns [`EngineError::AbsenceDateNotElapsed`] if `date` is today or
/// later.
pub fn detect_absences_for_date(
    teacher: &Teacher,
    sessions: &[SessionEvent],
    waivers: &[Waiver],
    policy: &Policy,
    date: NaiveDate,
    today: NaiveDate,
) -> EngineResult<Vec<AbsenceOutcome>> {
    if date >= today {
        return Err(EngineError::AbsenceDateNotElapsed { date });
    }

    let signals = daily_signals(teacher, sessions, date, date)?;
    let waiver = find_waiver(waivers, &teacher.id, date, DeductionType::Absence);

    let outcomes = signals
        .iter()
        .map(|signal| {
            let absence_base = match policy.package(&signal.package) {
                Ok(package) => package.absence_base,
                Err(_) => {
                    warn!(
                        teacher_id = %teacher.id,
                        student_id = %signal.student_id,
                        package = %signal.package,
                        "Package rate missing; absence deduction recorded as zero"
                    );
                    Decimal::ZERO
                }
            };
            compute_absence(signal, policy, absence_base, waiver, today)
        })
        .collect();

    Ok(outcomes)
}
