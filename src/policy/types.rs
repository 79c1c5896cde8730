//! Policy types for compensation calculation.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files and assembled into a validated
//! [`Policy`] snapshot once per request, rather than re-parsed ad hoc at
//! each use site.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// Metadata about the school the policy belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolMetadata {
    /// The school's display name.
    pub name: String,
    /// ISO currency code used for all amounts.
    pub currency: String,
    /// The version label of the policy configuration.
    pub version: String,
}

/// A subscription package: monthly rate plus base deduction amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Salary contribution per enrolled student per month.
    pub monthly_rate: Decimal,
    /// Base amount a lateness tier percentage is applied to.
    pub lateness_base: Decimal,
    /// Flat deduction for one absent day.
    pub absence_base: Decimal,
}

/// A lateness tier: an inclusive minute range and its deduction percentage.
///
/// # Example
///
/// ```
/// use comp_engine::policy::LatenessTier;
/// use rust_decimal::Decimal;
///
/// let tier = LatenessTier {
///     start_minutes: 4,
///     end_minutes: 7,
///     deduction_percent: Decimal::new(10, 0),
/// };
/// assert!(tier.contains(4));
/// assert!(tier.contains(7));
/// assert!(!tier.contains(8));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatenessTier {
    /// First minute of lateness covered by this tier (inclusive).
    pub start_minutes: i64,
    /// Last minute of lateness covered by this tier (inclusive).
    pub end_minutes: i64,
    /// Percentage of the package lateness base to deduct.
    pub deduction_percent: Decimal,
}

impl LatenessTier {
    /// Returns true if the given minutes of lateness fall in this tier.
    pub fn contains(&self, minutes: i64) -> bool {
        minutes >= self.start_minutes && minutes <= self.end_minutes
    }

    fn range_label(&self) -> String {
        format!("{}-{}", self.start_minutes, self.end_minutes)
    }
}

/// Deduction rules loaded from `deductions.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionConfig {
    /// Minutes of lateness tolerated with zero deduction.
    pub excused_threshold_minutes: i64,
    /// Whether Sundays count as working days and absence days.
    pub include_sundays: bool,
    /// Month numbers (1-12) in which absence deductions apply.
    /// Empty means always effective.
    #[serde(default)]
    pub absence_effective_months: Vec<u32>,
    /// The lateness tier table.
    pub lateness_tiers: Vec<LatenessTier>,
}

/// Package rates effective from a specific date, loaded from one file in
/// the `packages/` directory.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSnapshot {
    /// The date these package rates take effect.
    pub effective_date: NaiveDate,
    /// Map of package name to package rates.
    pub packages: HashMap<String, Package>,
}

/// Validates a lateness tier table and returns it sorted by start minute.
///
/// # Errors
///
/// - [`EngineError::InvalidTier`] if a tier's start is after its end or its
///   percentage is negative
/// - [`EngineError::OverlappingTiers`] if two tiers share any minute
///   (ranges are inclusive on both ends)
pub fn validate_tiers(tiers: &[LatenessTier]) -> EngineResult<Vec<LatenessTier>> {
    for tier in tiers {
        if tier.start_minutes > tier.end_minutes {
            return Err(EngineError::InvalidTier {
                message: format!(
                    "tier {} has start after end",
                    tier.range_label()
                ),
            });
        }
        if tier.deduction_percent < Decimal::ZERO {
            return Err(EngineError::InvalidTier {
                message: format!(
                    "tier {} has a negative deduction percentage",
                    tier.range_label()
                ),
            });
        }
    }

    let mut sorted = tiers.to_vec();
    sorted.sort_by_key(|t| t.start_minutes);

    for pair in sorted.windows(2) {
        if pair[1].start_minutes <= pair[0].end_minutes {
            return Err(EngineError::OverlappingTiers {
                first: pair[0].range_label(),
                second: pair[1].range_label(),
            });
        }
    }

    Ok(sorted)
}

/// A validated policy snapshot used for one calculation or batch.
///
/// Assembled by the policy loader from the deduction rules and the package
/// snapshot effective for the requested date. Construction validates the
/// tier table, so a `Policy` in hand is always internally consistent.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Version label, combining the configuration version and the package
    /// snapshot date.
    version: String,
    /// Package name to rates.
    packages: HashMap<String, Package>,
    /// Lateness tiers, sorted by start minute, non-overlapping.
    lateness_tiers: Vec<LatenessTier>,
    /// Minutes of lateness tolerated with zero deduction.
    excused_threshold_minutes: i64,
    /// Whether Sundays count as working days and absence days.
    include_sundays: bool,
    /// Months in which absence deductions apply; empty = always.
    absence_effective_months: Vec<u32>,
}

impl Policy {
    /// Creates a new validated policy snapshot.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tier table is invalid; see
    /// [`validate_tiers`].
    pub fn new(
        version: String,
        packages: HashMap<String, Package>,
        lateness_tiers: Vec<LatenessTier>,
        excused_threshold_minutes: i64,
        include_sundays: bool,
        absence_effective_months: Vec<u32>,
    ) -> EngineResult<Self> {
        let lateness_tiers = validate_tiers(&lateness_tiers)?;
        Ok(Self {
            version,
            packages,
            lateness_tiers,
            excused_threshold_minutes,
            include_sundays,
            absence_effective_months,
        })
    }

    /// Returns the policy version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Looks up a package by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PackageNotFound`] if the package is not
    /// defined. Callers that tolerate the gap (the aggregator) catch this
    /// and substitute a flagged zero rather than skipping the student.
    pub fn package(&self, name: &str) -> EngineResult<&Package> {
        self.packages
            .get(name)
            .ok_or_else(|| EngineError::PackageNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the lateness tiers, sorted by start minute.
    pub fn lateness_tiers(&self) -> &[LatenessTier] {
        &self.lateness_tiers
    }

    /// Returns the excused lateness threshold in minutes.
    pub fn excused_threshold_minutes(&self) -> i64 {
        self.excused_threshold_minutes
    }

    /// Returns true if Sundays count as working and absence days.
    pub fn include_sundays(&self) -> bool {
        self.include_sundays
    }

    /// Returns true if absence deductions apply in the given month (1-12).
    ///
    /// An empty effective-months list means absences are always effective.
    pub fn month_effective(&self, month: u32) -> bool {
        self.absence_effective_months.is_empty()
            || self.absence_effective_months.contains(&month)
    }

    /// Returns the largest tier end minute, if any tiers are configured.
    pub fn max_tier_end(&self) -> Option<i64> {
        self.lateness_tiers.iter().map(|t| t.end_minutes).max()
    }
}
