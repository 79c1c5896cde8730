//! Response types for the Teacher Compensation Engine API.
//!
//! This module defines the success and error response structures and the
//! mapping from engine errors to HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::calculation::AbsenceOutcome;
use crate::error::EngineError;
use crate::models::{BatchSummary, CompensationBreakdown};

/// Response body for `/salary/calculate-all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationResponse {
    /// One breakdown per successfully calculated teacher.
    pub breakdowns: Vec<CompensationBreakdown>,
    /// Processed/errored counts and per-teacher failures.
    pub summary: BatchSummary,
}

/// Response body for `/absences/detect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectAbsencesResponse {
    /// The outcome for every evaluated student day.
    pub outcomes: Vec<AbsenceOutcome>,
    /// How many new deduction records were materialized.
    pub recorded: usize,
}

/// Response body for `/waivers/apply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyWaiverResponse {
    /// How many materialized records the waiver adjusted.
    pub adjusted: usize,
}

/// Response body for `/cache/clear`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    /// How many cache entries were removed.
    pub cleared: usize,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::PackageNotFound { name } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "PACKAGE_NOT_FOUND",
                    format!("Package not found: {}", name),
                    "The package is not defined in the active policy",
                ),
            },
            EngineError::SnapshotNotFound { date } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "SNAPSHOT_NOT_FOUND",
                    format!("No package rate snapshot effective on or before {}", date),
                    "The policy has no package rates for the requested period",
                ),
            },
            EngineError::OverlappingTiers { first, second } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_TIERS",
                    format!("Overlapping lateness tiers: {} and {}", first, second),
                    "Lateness tier ranges are inclusive and must be disjoint",
                ),
            },
            EngineError::InvalidTier { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "INVALID_TIERS",
                    "Invalid lateness tier",
                    message,
                ),
            },
            EngineError::InvalidDateRange { from, to } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "INVALID_DATE_RANGE",
                    format!("Invalid date range: {} is after {}", from, to),
                ),
            },
            EngineError::AbsenceDateNotElapsed { date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(
                    "DATE_NOT_ELAPSED",
                    format!("Absence cannot be evaluated for {}: the day has not elapsed", date),
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
