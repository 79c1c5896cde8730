//! Policy loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading compensation
//! policy from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{validate_tiers, DeductionConfig, PackageSnapshot, Policy, SchoolMetadata};

/// Loads and provides access to compensation policy configuration.
///
/// The `PolicyLoader` reads YAML configuration files from a directory and
/// resolves a validated [`Policy`] snapshot for any as-of date.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/school/
/// ├── school.yaml       # School metadata
/// ├── deductions.yaml   # Lateness tiers, thresholds, absence rules
/// └── packages/
///     └── 2026-01-01.yaml  # Package rates effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use comp_engine::policy::PolicyLoader;
/// use chrono::NaiveDate;
///
/// let loader = PolicyLoader::load("./config/school").unwrap();
///
/// let as_of = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
/// let policy = loader.get_policy(as_of).unwrap();
/// println!("Policy version: {}", policy.version());
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    school: SchoolMetadata,
    deductions: DeductionConfig,
    /// Package snapshots sorted by effective date ascending.
    snapshots: Vec<PackageSnapshot>,
}

impl PolicyLoader {
    /// Loads policy configuration from the specified directory.
    ///
    /// The lateness tier table is validated here, at load time, so
    /// overlapping or malformed tiers surface immediately instead of at the
    /// first calculation that hits them.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a file contains
    /// invalid YAML, or the tier table is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let school_path = path.join("school.yaml");
        let school = Self::load_yaml::<SchoolMetadata>(&school_path)?;

        let deductions_path = path.join("deductions.yaml");
        let deductions = Self::load_yaml::<DeductionConfig>(&deductions_path)?;
        validate_tiers(&deductions.lateness_tiers)?;

        let packages_dir = path.join("packages");
        let snapshots = Self::load_snapshots(&packages_dir)?;

        Ok(Self {
            school,
            deductions,
            snapshots,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all package snapshot files from the packages directory.
    fn load_snapshots(packages_dir: &Path) -> EngineResult<Vec<PackageSnapshot>> {
        let dir_str = packages_dir.display().to_string();

        if !packages_dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(packages_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut snapshots = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let snapshot = Self::load_yaml::<PackageSnapshot>(&path)?;
                snapshots.push(snapshot);
            }
        }

        if snapshots.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no package snapshot files found)", dir_str),
            });
        }

        snapshots.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Ok(snapshots)
    }

    /// Returns the school metadata.
    pub fn school(&self) -> &SchoolMetadata {
        &self.school
    }

    /// Resolves the policy snapshot effective for the given date.
    ///
    /// The most recent package snapshot effective on or before `as_of` is
    /// combined with the deduction rules into a validated [`Policy`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SnapshotNotFound`] if no package snapshot is
    /// effective on or before `as_of`.
    pub fn get_policy(&self, as_of: NaiveDate) -> EngineResult<Policy> {
        let snapshot = self
            .snapshots
            .iter()
            .rev()
            .find(|s| s.effective_date <= as_of)
            .ok_or(EngineError::SnapshotNotFound { date: as_of })?;

        Policy::new(
            format!("{}/{}", self.school.version, snapshot.effective_date),
            snapshot.packages.clone(),
            self.deductions.lateness_tiers.clone(),
            self.deductions.excused_threshold_minutes,
            self.deductions.include_sundays,
            self.deductions.absence_effective_months.clone(),
        )
    }
}
