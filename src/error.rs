//! Error types for the Teacher Compensation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during compensation calculation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Teacher Compensation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// Data anomalies that affect a single student (a missing package rate, an
/// unrecognized weekday pattern) are deliberately *not* errors: they are
/// flagged in the resulting breakdown and logged, so one student's bad data
/// never aborts a teacher's calculation.
///
/// # Example
///
/// ```
/// use comp_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A package name was not found in the active policy.
    #[error("Package not found: {name}")]
    PackageNotFound {
        /// The package name that was not found.
        name: String,
    },

    /// No package rate snapshot is effective on or before the requested date.
    #[error("No package rate snapshot effective on or before {date}")]
    SnapshotNotFound {
        /// The date for which a snapshot was requested.
        date: NaiveDate,
    },

    /// Two lateness tiers overlap. Tier ranges are inclusive on both ends
    /// and must be disjoint.
    #[error("Overlapping lateness tiers: {first} and {second}")]
    OverlappingTiers {
        /// The first tier range, formatted as "start-end".
        first: String,
        /// The second tier range, formatted as "start-end".
        second: String,
    },

    /// A lateness tier was structurally invalid.
    #[error("Invalid lateness tier: {message}")]
    InvalidTier {
        /// A description of what made the tier invalid.
        message: String,
    },

    /// A date range had its start after its end.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        /// The start of the range.
        from: NaiveDate,
        /// The end of the range.
        to: NaiveDate,
    },

    /// Absence detection was requested for a day that has not yet elapsed.
    #[error("Absence cannot be evaluated for {date}: the day has not elapsed")]
    AbsenceDateNotElapsed {
        /// The rejected date.
        date: NaiveDate,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_package_not_found_displays_name() {
        let error = EngineError::PackageNotFound {
            name: "platinum".to_string(),
        };
        assert_eq!(error.to_string(), "Package not found: platinum");
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_snapshot_not_found_displays_date() {
        let error = EngineError::SnapshotNotFound {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No package rate snapshot effective on or before 2020-01-01"
        );
    }

    #[test]
    fn test_overlapping_tiers_displays_both_ranges() {
        let error = EngineError::OverlappingTiers {
            first: "4-7".to_string(),
            second: "6-14".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Overlapping lateness tiers: 4-7 and 6-14"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_both_dates() {
        let error = EngineError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: 2026-02-01 is after 2026-01-01"
        );
    }

    #[test]
    fn test_absence_date_not_elapsed_displays_date() {
        let error = EngineError::AbsenceDateNotElapsed {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Absence cannot be evaluated for 2026-03-14: the day has not elapsed"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
