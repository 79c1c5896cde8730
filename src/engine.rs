//! The engine facade: cached calculation, absence materialization, and
//! waiver application over a loaded policy.
//!
//! [`CompensationEngine`] wires the policy loader, the result cache, and
//! the deduction ledger together and exposes the engine's logical
//! operations. Calculations for different teachers are independent and safe
//! to run concurrently; the cache and ledger are the only shared state.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::cache::{CacheKey, ResultCache};
use crate::calculation::{
    calculate_all_teacher_salaries, calculate_teacher_salary, detect_absences_for_date,
    AbsenceOutcome,
};
use crate::error::{EngineError, EngineResult};
use crate::ledger::DeductionLedger;
use crate::models::{
    BatchSummary, BonusRecord, CompensationBreakdown, DeductionRecord, DeductionType, Period,
    SessionEvent, Teacher, Waiver,
};
use crate::policy::PolicyLoader;

/// The Teacher Compensation Engine.
///
/// Stateless between calls except for the result cache and the deduction
/// ledger. Policy is resolved per request as of the period end date; the
/// snapshot in effect at the end of the period governs the whole period.
pub struct CompensationEngine {
    policy: PolicyLoader,
    cache: ResultCache,
    ledger: RwLock<DeductionLedger>,
}

impl CompensationEngine {
    /// Creates an engine over a loaded policy.
    pub fn new(policy: PolicyLoader) -> Self {
        Self {
            policy,
            cache: ResultCache::new(),
            ledger: RwLock::new(DeductionLedger::new()),
        }
    }

    /// Returns the policy loader.
    pub fn policy(&self) -> &PolicyLoader {
        &self.policy
    }

    /// Calculates one teacher's salary, served from the cache when a
    /// breakdown for the same (teacher, period) is already present.
    ///
    /// Two sequential calls with identical arguments and no intervening
    /// invalidation return the same shared breakdown.
    pub fn calculate_teacher_salary(
        &self,
        teacher: &Teacher,
        sessions: &[SessionEvent],
        bonuses: &[BonusRecord],
        waivers: &[Waiver],
        period: &Period,
        today: NaiveDate,
    ) -> EngineResult<Arc<CompensationBreakdown>> {
        period.validate()?;

        let key = CacheKey {
            teacher_id: teacher.id.clone(),
            start_date: period.start_date,
            end_date: period.end_date,
        };
        if let Some(cached) = self.cache.get(&key) {
            info!(teacher_id = %teacher.id, "Serving compensation breakdown from cache");
            return Ok(cached);
        }

        let policy = self.policy.get_policy(period.end_date)?;
        let breakdown = calculate_teacher_salary(
            teacher, sessions, bonuses, waivers, period, &policy, today,
        )?;
        Ok(self.cache.put(key, breakdown))
    }

    /// Calculates salaries for many teachers with per-teacher failure
    /// isolation. Successful breakdowns are cached individually.
    ///
    /// # Errors
    ///
    /// Fails as a whole only for malformed input shared by every teacher:
    /// an invalid period or an unresolvable policy snapshot.
    pub fn calculate_all_teacher_salaries(
        &self,
        teachers: &[Teacher],
        sessions: &[SessionEvent],
        bonuses: &[BonusRecord],
        waivers: &[Waiver],
        period: &Period,
        today: NaiveDate,
    ) -> EngineResult<(Vec<CompensationBreakdown>, BatchSummary)> {
        period.validate()?;
        let policy = self.policy.get_policy(period.end_date)?;

        let (breakdowns, summary) = calculate_all_teacher_salaries(
            teachers, sessions, bonuses, waivers, period, &policy, today,
        );

        for breakdown in &breakdowns {
            self.cache.put(
                CacheKey {
                    teacher_id: breakdown.teacher_id.clone(),
                    start_date: period.start_date,
                    end_date: period.end_date,
                },
                breakdown.clone(),
            );
        }

        info!(
            processed = summary.processed,
            errored = summary.errored,
            "Batch salary calculation finished"
        );
        Ok((breakdowns, summary))
    }

    /// Detects absences for one teacher and day, materializing the absent
    /// outcomes as deduction records in the ledger.
    ///
    /// Returns every outcome (present, suppressed, and absent) so the
    /// caller can see why each student day was or was not counted.
    pub fn detect_absences_for_date(
        &self,
        teacher: &Teacher,
        sessions: &[SessionEvent],
        waivers: &[Waiver],
        date: NaiveDate,
        today: NaiveDate,
    ) -> EngineResult<(Vec<AbsenceOutcome>, usize)> {
        let policy = self.policy.get_policy(date)?;
        let outcomes =
            detect_absences_for_date(teacher, sessions, waivers, &policy, date, today)?;

        let recorded = self
            .write_ledger()
            .record_absences(&teacher.id, &outcomes);
        Ok((outcomes, recorded))
    }

    /// Applies a waiver to the matching materialized deduction records and
    /// invalidates the teacher's cached breakdowns.
    ///
    /// Returns the number of records adjusted.
    pub fn apply_waiver(
        &self,
        teacher_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        deduction_type: DeductionType,
        reason: &str,
    ) -> EngineResult<usize> {
        if start_date > end_date {
            return Err(EngineError::InvalidDateRange {
                from: start_date,
                to: end_date,
            });
        }

        let now: DateTime<Utc> = Utc::now();
        let adjusted = self.write_ledger().apply_waiver(
            teacher_id,
            start_date,
            end_date,
            deduction_type,
            reason,
            now,
        );
        self.cache.invalidate_teacher(teacher_id);
        Ok(adjusted)
    }

    /// Clears cached breakdowns for one teacher, or all of them.
    ///
    /// Returns the number of entries removed.
    pub fn clear_cache(&self, teacher_id: Option<&str>) -> usize {
        match teacher_id {
            Some(id) => self.cache.invalidate_teacher(id),
            None => self.cache.invalidate_all(),
        }
    }

    /// Returns a copy of the materialized records for one teacher.
    pub fn ledger_records_for(&self, teacher_id: &str) -> Vec<DeductionRecord> {
        self.read_ledger()
            .records_for_teacher(teacher_id)
            .into_iter()
            .cloned()
            .collect()
    }

    fn read_ledger(&self) -> std::sync::RwLockReadGuard<'_, DeductionLedger> {
        self.ledger.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_ledger(&self) -> std::sync::RwLockWriteGuard<'_, DeductionLedger> {
        self.ledger.write().unwrap_or_else(|e| e.into_inner())
    }
}
