//! Lateness tier evaluation.
//!
//! Converts a (scheduled time, actual start time) pair into whole minutes of
//! lateness and a tiered deduction against the package's lateness base
//! amount. Lateness is only evaluated for days that have a session event at
//! all; a day with no session is handled by absence detection instead.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::round_currency;
use crate::policy::Policy;

/// Tier label for lateness within the excused threshold.
pub const EXCUSED_TIER_LABEL: &str = "Excused";

/// Tier label for lateness beyond the last configured tier.
pub const BEYOND_MAX_TIER_LABEL: &str = "> Max Tier";

/// The outcome of evaluating one late session start.
#[derive(Debug, Clone, PartialEq)]
pub struct LatenessAssessment {
    /// Whole minutes of lateness, never negative.
    pub minutes_late: i64,
    /// The matched tier's deduction percentage.
    pub deduction_percent: Decimal,
    /// The matched tier label ("Excused", "Tier 1", "> Max Tier", ...).
    pub tier: String,
    /// The deduction amount, rounded to currency precision.
    pub amount: Decimal,
}

/// Computes whole minutes of lateness between a scheduled and actual start.
///
/// The difference is rounded to the nearest minute; early starts clamp to
/// zero.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::minutes_late;
/// use chrono::NaiveDateTime;
///
/// let scheduled =
///     NaiveDateTime::parse_from_str("2026-01-05 15:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let actual =
///     NaiveDateTime::parse_from_str("2026-01-05 15:09:40", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(minutes_late(scheduled, actual), 10);
///
/// let early =
///     NaiveDateTime::parse_from_str("2026-01-05 14:45:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(minutes_late(scheduled, early), 0);
/// ```
pub fn minutes_late(scheduled: NaiveDateTime, actual: NaiveDateTime) -> i64 {
    let seconds = (actual - scheduled).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + 30) / 60
}

/// Evaluates lateness for one session start against the policy tier table.
///
/// Evaluation order:
/// 1. minutes within the excused threshold deduct nothing
/// 2. the first tier containing the minutes wins (bounds inclusive), with
///    the label "Tier N" by position in the sorted table
/// 3. minutes beyond the last tier's end deduct 100% of `lateness_base`
///
/// Minutes that fall in a gap between configured tiers deduct nothing; an
/// empty tier table treats everything past the threshold as beyond the max
/// tier.
///
/// The returned amount is `lateness_base * percent / 100`, rounded half-up
/// to two decimal places. Rounding happens here, once per deduction
/// instance; aggregation sums the already-rounded amounts.
pub fn compute_lateness(
    scheduled: NaiveDateTime,
    actual: NaiveDateTime,
    lateness_base: Decimal,
    policy: &Policy,
) -> LatenessAssessment {
    let minutes = minutes_late(scheduled, actual);

    if minutes <= policy.excused_threshold_minutes() {
        return LatenessAssessment {
            minutes_late: minutes,
            deduction_percent: Decimal::ZERO,
            tier: EXCUSED_TIER_LABEL.to_string(),
            amount: Decimal::ZERO,
        };
    }

    for (index, tier) in policy.lateness_tiers().iter().enumerate() {
        if tier.contains(minutes) {
            let amount =
                round_currency(lateness_base * tier.deduction_percent / Decimal::ONE_HUNDRED);
            return LatenessAssessment {
                minutes_late: minutes,
                deduction_percent: tier.deduction_percent,
                tier: format!("Tier {}", index + 1),
                amount,
            };
        }
    }

    if policy.max_tier_end().is_none_or(|end| minutes > end) {
        return LatenessAssessment {
            minutes_late: minutes,
            deduction_percent: Decimal::ONE_HUNDRED,
            tier: BEYOND_MAX_TIER_LABEL.to_string(),
            amount: round_currency(lateness_base),
        };
    }

    // Minutes landed in a gap between tiers: no deduction is configured for
    // this range.
    LatenessAssessment {
        minutes_late: minutes,
        deduction_percent: Decimal::ZERO,
        tier: EXCUSED_TIER_LABEL.to_string(),
        amount: Decimal::ZERO,
    }
}
