//! Waiver resolution.

use chrono::NaiveDate;

use crate::models::{DeductionType, Waiver};

/// Finds the first waiver covering a teacher, date, and deduction type.
///
/// # Example
///
/// ```
/// use comp_engine::calculation::find_waiver;
/// use comp_engine::models::{DeductionType, Waiver};
/// use chrono::NaiveDate;
///
/// let waivers = vec![Waiver {
///     teacher_id: "tch_001".to_string(),
///     deduction_type: DeductionType::Lateness,
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
///     reason: "transport strike".to_string(),
/// }];
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
/// assert!(find_waiver(&waivers, "tch_001", date, DeductionType::Lateness).is_some());
/// assert!(find_waiver(&waivers, "tch_001", date, DeductionType::Absence).is_none());
/// assert!(find_waiver(&waivers, "tch_002", date, DeductionType::Lateness).is_none());
/// ```
pub fn find_waiver<'a>(
    waivers: &'a [Waiver],
    teacher_id: &str,
    date: NaiveDate,
    deduction_type: DeductionType,
) -> Option<&'a Waiver> {
    waivers
        .iter()
        .find(|w| w.covers(teacher_id, date, deduction_type))
}
