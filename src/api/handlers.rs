//! HTTP request handlers for the Teacher Compensation Engine API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler converts its request DTOs into domain types, calls the engine,
//! and maps the result (or error) back to JSON.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{BonusRecord, Period, SessionEvent, Teacher, Waiver};

use super::request::{
    ApplyWaiverRequest, BatchCalculationRequest, CalculationRequest, ClearCacheRequest,
    DetectAbsencesRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, ApplyWaiverResponse, BatchCalculationResponse,
    ClearCacheResponse, DetectAbsencesResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/salary/calculate", post(calculate_handler))
        .route("/salary/calculate-all", post(calculate_all_handler))
        .route("/absences/detect", post(detect_absences_handler))
        .route("/waivers/apply", post(apply_waiver_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .with_state(state)
}

/// Maps a JSON extraction rejection to an API error.
fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Unwraps a JSON payload or produces the 400 response.
fn require_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Resolves the absence-evaluation horizon for a request.
fn resolve_today(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| Utc::now().date_naive())
}

/// Handler for POST /salary/calculate.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary calculation request");

    let request = match require_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let teacher: Teacher = request.teacher.into();
    let sessions: Vec<SessionEvent> = request.sessions.into_iter().map(Into::into).collect();
    let bonuses: Vec<BonusRecord> = request.bonuses.into_iter().map(Into::into).collect();
    let waivers: Vec<Waiver> = request.waivers.into_iter().map(Into::into).collect();
    let period: Period = request.period.into();
    let today = resolve_today(request.today);

    match state
        .engine()
        .calculate_teacher_salary(&teacher, &sessions, &bonuses, &waivers, &period, today)
    {
        Ok(breakdown) => {
            info!(
                correlation_id = %correlation_id,
                teacher_id = %breakdown.teacher_id,
                net_salary = %breakdown.net_salary,
                students = breakdown.student_count,
                "Salary calculation completed"
            );
            (StatusCode::OK, Json(breakdown.as_ref().clone())).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Salary calculation failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /salary/calculate-all.
async fn calculate_all_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch salary calculation request");

    let request = match require_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let teachers: Vec<Teacher> = request.teachers.into_iter().map(Into::into).collect();
    let sessions: Vec<SessionEvent> = request.sessions.into_iter().map(Into::into).collect();
    let bonuses: Vec<BonusRecord> = request.bonuses.into_iter().map(Into::into).collect();
    let waivers: Vec<Waiver> = request.waivers.into_iter().map(Into::into).collect();
    let period: Period = request.period.into();
    let today = resolve_today(request.today);

    match state.engine().calculate_all_teacher_salaries(
        &teachers, &sessions, &bonuses, &waivers, &period, today,
    ) {
        Ok((breakdowns, summary)) => {
            info!(
                correlation_id = %correlation_id,
                processed = summary.processed,
                errored = summary.errored,
                "Batch salary calculation completed"
            );
            (
                StatusCode::OK,
                Json(BatchCalculationResponse {
                    breakdowns,
                    summary,
                }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Batch calculation rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /absences/detect.
async fn detect_absences_handler(
    State(state): State<AppState>,
    payload: Result<Json<DetectAbsencesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing absence detection request");

    let request = match require_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let teacher: Teacher = request.teacher.into();
    let sessions: Vec<SessionEvent> = request.sessions.into_iter().map(Into::into).collect();
    let waivers: Vec<Waiver> = request.waivers.into_iter().map(Into::into).collect();
    let today = resolve_today(request.today);

    match state
        .engine()
        .detect_absences_for_date(&teacher, &sessions, &waivers, request.date, today)
    {
        Ok((outcomes, recorded)) => {
            info!(
                correlation_id = %correlation_id,
                teacher_id = %teacher.id,
                date = %request.date,
                absences = outcomes.iter().filter(|o| o.is_absent).count(),
                recorded,
                "Absence detection completed"
            );
            (
                StatusCode::OK,
                Json(DetectAbsencesResponse { outcomes, recorded }),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Absence detection failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /waivers/apply.
async fn apply_waiver_handler(
    State(state): State<AppState>,
    payload: Result<Json<ApplyWaiverRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing waiver application request");

    let request = match require_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.engine().apply_waiver(
        &request.teacher_id,
        request.start_date,
        request.end_date,
        request.deduction_type,
        &request.reason,
    ) {
        Ok(adjusted) => {
            info!(
                correlation_id = %correlation_id,
                teacher_id = %request.teacher_id,
                deduction_type = %request.deduction_type,
                adjusted,
                "Waiver applied"
            );
            (StatusCode::OK, Json(ApplyWaiverResponse { adjusted })).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Waiver application failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /cache/clear.
async fn clear_cache_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClearCacheRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match require_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let cleared = state.engine().clear_cache(request.teacher_id.as_deref());
    info!(
        correlation_id = %correlation_id,
        teacher_id = request.teacher_id.as_deref().unwrap_or("*"),
        cleared,
        "Cache cleared"
    );
    (StatusCode::OK, Json(ClearCacheResponse { cleared })).into_response()
}
