//! Base pay proration over working days.
//!
//! A student's monthly package rate is spread over the working days of the
//! requested period; the teacher earns the resulting daily rate only on
//! teaching days, i.e. days a session event exists. Base pay is
//! attendance-based, not schedule-based.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

/// Counts the working days in an inclusive date range.
///
/// Every day counts except Sundays when `include_sundays` is false; the
/// same rule the absence engine applies, so proration and absence always
/// agree on what a working day is.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::working_days_in_period;
/// use chrono::NaiveDate;
///
/// let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let to = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap();
/// // January 1-30, 2026 contains four Sundays.
/// assert_eq!(working_days_in_period(from, to, false), 26);
/// assert_eq!(working_days_in_period(from, to, true), 30);
/// ```
pub fn working_days_in_period(from: NaiveDate, to: NaiveDate, include_sundays: bool) -> u32 {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| include_sundays || d.weekday() != Weekday::Sun)
        .count() as u32
}

/// Computes the per-working-day rate for a monthly package rate.
///
/// Returns zero for a period with no working days. The result is kept at
/// full precision; rounding happens only when aggregate currency amounts
/// are produced.
pub fn daily_rate(monthly_rate: Decimal, working_days: u32) -> Decimal {
    if working_days == 0 {
        return Decimal::ZERO;
    }
    monthly_rate / Decimal::from(working_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::round_currency;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_full_january_2026_without_sundays() {
        // January 2026 has 31 days and four Sundays (4, 11, 18, 25).
        assert_eq!(
            working_days_in_period(date("2026-01-01"), date("2026-01-31"), false),
            27
        );
    }

    #[test]
    fn test_single_day_period() {
        assert_eq!(
            working_days_in_period(date("2026-01-05"), date("2026-01-05"), false),
            1
        );
        // A lone Sunday.
        assert_eq!(
            working_days_in_period(date("2026-01-11"), date("2026-01-11"), false),
            0
        );
        assert_eq!(
            working_days_in_period(date("2026-01-11"), date("2026-01-11"), true),
            1
        );
    }

    /// BP-001: 3000 over 26 working days, 20 attended, is 2307.69.
    #[test]
    fn test_proration_scenario() {
        let rate = daily_rate(dec("3000"), 26);
        let base = round_currency(rate * Decimal::from(20));
        assert_eq!(base, dec("2307.69"));
    }

    #[test]
    fn test_daily_rate_with_zero_working_days() {
        assert_eq!(daily_rate(dec("3000"), 0), Decimal::ZERO);
    }
}
