//! Materialized deduction records and waiver application.
//!
//! Absence detection produces candidate deduction records; the ledger holds
//! them so administrative waivers can be applied after the fact. Waived
//! records are zeroed in place with an audit trail (original amount, reason,
//! timestamp), never deleted, so compensation history stays reconstructible.
//! Durable persistence of the records belongs to the surrounding system;
//! the ledger defines the adjustment semantics.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::calculation::AbsenceOutcome;
use crate::models::{DeductionRecord, DeductionType, ReviewState};

/// In-memory registry of materialized deduction records.
#[derive(Debug, Default)]
pub struct DeductionLedger {
    records: Vec<DeductionRecord>,
}

impl DeductionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all records.
    pub fn records(&self) -> &[DeductionRecord] {
        &self.records
    }

    /// Returns the records for one teacher.
    pub fn records_for_teacher(&self, teacher_id: &str) -> Vec<&DeductionRecord> {
        self.records
            .iter()
            .filter(|r| r.teacher_id == teacher_id)
            .collect()
    }

    /// Materializes absence outcomes as deduction records.
    ///
    /// Only outcomes flagged absent become records. A record already
    /// present for the same (teacher, student, date, type) is left alone,
    /// so re-running detection for a day is idempotent. Returns the number
    /// of records added.
    pub fn record_absences(&mut self, teacher_id: &str, outcomes: &[AbsenceOutcome]) -> usize {
        let mut added = 0;
        for outcome in outcomes.iter().filter(|o| o.is_absent) {
            let exists = self.records.iter().any(|r| {
                r.teacher_id == teacher_id
                    && r.student_id == outcome.student_id
                    && r.date == outcome.date
                    && r.deduction_type == DeductionType::Absence
            });
            if exists {
                continue;
            }

            self.records.push(DeductionRecord {
                id: Uuid::new_v4(),
                teacher_id: teacher_id.to_string(),
                student_id: outcome.student_id.clone(),
                deduction_type: DeductionType::Absence,
                date: outcome.date,
                scheduled_time: outcome.scheduled_time,
                amount: outcome.deduction,
                permitted: false,
                review_state: ReviewState::Pending,
                original_amount: None,
                waiver_reason: None,
                waived_at: None,
            });
            added += 1;
        }
        added
    }

    /// Applies a waiver to the matching records.
    ///
    /// Matching records (teacher, date range, deduction type) not yet
    /// waived are zeroed with their original amount, the waiver reason, and
    /// the timestamp retained. Returns the number of records adjusted.
    pub fn apply_waiver(
        &mut self,
        teacher_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        deduction_type: DeductionType,
        reason: &str,
        now: DateTime<Utc>,
    ) -> usize {
        let mut adjusted = 0;
        for record in self.records.iter_mut() {
            if record.teacher_id != teacher_id
                || record.deduction_type != deduction_type
                || record.date < start_date
                || record.date > end_date
                || record.is_waived()
            {
                continue;
            }

            record.original_amount = Some(record.amount);
            record.amount = Decimal::ZERO;
            record.waiver_reason = Some(reason.to_string());
            record.waived_at = Some(now);
            record.permitted = true;
            adjusted += 1;
        }

        if adjusted > 0 {
            info!(
                teacher_id = %teacher_id,
                deduction_type = %deduction_type,
                adjusted,
                "Applied waiver to materialized deduction records"
            );
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::AbsenceReason;
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn absent_outcome(student_id: &str, day: &str, amount: &str) -> AbsenceOutcome {
        AbsenceOutcome {
            student_id: student_id.to_string(),
            date: date(day),
            scheduled_time: NaiveTime::from_hms_opt(15, 0, 0),
            is_absent: true,
            reason: AbsenceReason::Absent,
            deduction: dec(amount),
            waiver_reason: None,
        }
    }

    fn present_outcome(student_id: &str, day: &str) -> AbsenceOutcome {
        AbsenceOutcome {
            student_id: student_id.to_string(),
            date: date(day),
            scheduled_time: NaiveTime::from_hms_opt(15, 0, 0),
            is_absent: false,
            reason: AbsenceReason::Present,
            deduction: Decimal::ZERO,
            waiver_reason: None,
        }
    }

    #[test]
    fn test_only_absent_outcomes_are_recorded() {
        let mut ledger = DeductionLedger::new();
        let added = ledger.record_absences(
            "tch_001",
            &[
                absent_outcome("stu_001", "2026-01-07", "45"),
                present_outcome("stu_002", "2026-01-07"),
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].student_id, "stu_001");
        assert_eq!(ledger.records()[0].review_state, ReviewState::Pending);
    }

    #[test]
    fn test_recording_is_idempotent_per_day() {
        let mut ledger = DeductionLedger::new();
        let outcomes = [absent_outcome("stu_001", "2026-01-07", "45")];
        assert_eq!(ledger.record_absences("tch_001", &outcomes), 1);
        assert_eq!(ledger.record_absences("tch_001", &outcomes), 0);
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn test_apply_waiver_zeroes_with_audit_trail() {
        let mut ledger = DeductionLedger::new();
        ledger.record_absences("tch_001", &[absent_outcome("stu_001", "2026-01-07", "45")]);

        let now = Utc::now();
        let adjusted = ledger.apply_waiver(
            "tch_001",
            date("2026-01-05"),
            date("2026-01-09"),
            DeductionType::Absence,
            "approved sick leave",
            now,
        );

        assert_eq!(adjusted, 1);
        let record = &ledger.records()[0];
        assert_eq!(record.amount, Decimal::ZERO);
        assert_eq!(record.original_amount, Some(dec("45")));
        assert_eq!(record.waiver_reason.as_deref(), Some("approved sick leave"));
        assert_eq!(record.waived_at, Some(now));
        assert!(record.permitted);
    }

    #[test]
    fn test_apply_waiver_skips_unrelated_records() {
        let mut ledger = DeductionLedger::new();
        ledger.record_absences("tch_001", &[absent_outcome("stu_001", "2026-01-07", "45")]);
        ledger.record_absences("tch_002", &[absent_outcome("stu_002", "2026-01-07", "60")]);
        ledger.record_absences("tch_001", &[absent_outcome("stu_001", "2026-02-03", "45")]);

        let adjusted = ledger.apply_waiver(
            "tch_001",
            date("2026-01-01"),
            date("2026-01-31"),
            DeductionType::Absence,
            "January closure",
            Utc::now(),
        );

        assert_eq!(adjusted, 1);
        // Other teacher and other month untouched.
        assert!(!ledger.records_for_teacher("tch_002")[0].is_waived());
        let february: Vec<_> = ledger
            .records_for_teacher("tch_001")
            .into_iter()
            .filter(|r| r.date == date("2026-02-03"))
            .collect();
        assert!(!february[0].is_waived());
    }

    #[test]
    fn test_apply_waiver_is_idempotent() {
        let mut ledger = DeductionLedger::new();
        ledger.record_absences("tch_001", &[absent_outcome("stu_001", "2026-01-07", "45")]);

        let first = ledger.apply_waiver(
            "tch_001",
            date("2026-01-07"),
            date("2026-01-07"),
            DeductionType::Absence,
            "first",
            Utc::now(),
        );
        let second = ledger.apply_waiver(
            "tch_001",
            date("2026-01-07"),
            date("2026-01-07"),
            DeductionType::Absence,
            "second",
            Utc::now(),
        );

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        // The first waiver's audit trail is preserved.
        assert_eq!(
            ledger.records()[0].waiver_reason.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_apply_waiver_respects_deduction_type() {
        let mut ledger = DeductionLedger::new();
        ledger.record_absences("tch_001", &[absent_outcome("stu_001", "2026-01-07", "45")]);

        let adjusted = ledger.apply_waiver(
            "tch_001",
            date("2026-01-01"),
            date("2026-01-31"),
            DeductionType::Lateness,
            "wrong type",
            Utc::now(),
        );
        assert_eq!(adjusted, 0);
    }
}
