//! HTTP API for the Teacher Compensation Engine.
//!
//! A thin JSON adapter over the engine: one route per logical operation,
//! request DTOs decoupled from the domain types, and a typed error-to-status
//! mapping. Authentication and routing composition belong to the
//! surrounding system.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ApplyWaiverRequest, BatchCalculationRequest, BonusRequest, CalculationRequest,
    ClearCacheRequest, DetectAbsencesRequest, PeriodRequest, SessionEventRequest, StudentRequest,
    TeacherRequest, WaiverRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, ApplyWaiverResponse, BatchCalculationResponse,
    ClearCacheResponse, DetectAbsencesResponse,
};
pub use state::AppState;
