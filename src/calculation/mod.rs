//! Calculation logic for the Teacher Compensation Engine.
//!
//! This module contains all the calculation functions for determining a
//! teacher's compensation: attendance signal extraction, lateness tier
//! evaluation, absence detection, waiver resolution, base pay proration,
//! and the aggregation pass that combines them into a breakdown.

mod absence;
mod aggregator;
mod base_pay;
mod lateness;
mod signals;
mod waivers;

use rust_decimal::{Decimal, RoundingStrategy};

pub use absence::{compute_absence, detect_absences_for_date, AbsenceOutcome, AbsenceReason};
pub use aggregator::{calculate_all_teacher_salaries, calculate_teacher_salary};
pub use base_pay::{daily_rate, working_days_in_period};
pub use lateness::{
    compute_lateness, minutes_late, LatenessAssessment, BEYOND_MAX_TIER_LABEL, EXCUSED_TIER_LABEL,
};
pub use signals::{daily_signals, student_day_signals, StudentDaySignal};
pub use waivers::find_waiver;

/// Rounds a currency amount half-up to two decimal places.
///
/// Rounding happens once per deduction instance or aggregate boundary;
/// intermediate sums are kept at full precision so rounding error never
/// compounds.
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
