//! Request types for the Teacher Compensation Engine API.
//!
//! This module defines the JSON request structures for the API endpoints.
//! Request DTOs are decoupled from the domain types and convert into them
//! with `From` impls.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    BonusRecord, DeductionType, Period, SessionEvent, Student, StudentStatus, Teacher, Waiver,
};

/// Request body for the `/salary/calculate` endpoint.
///
/// Contains the teacher roster, the raw session events, bonuses, waivers,
/// and the period to calculate over. The optional `today` field pins the
/// absence-evaluation horizon for reproducible runs; it defaults to the
/// current date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The teacher and their assigned students.
    pub teacher: TeacherRequest,
    /// Session events in or around the period.
    #[serde(default)]
    pub sessions: Vec<SessionEventRequest>,
    /// Bonuses granted to the teacher.
    #[serde(default)]
    pub bonuses: Vec<BonusRequest>,
    /// Active waivers.
    #[serde(default)]
    pub waivers: Vec<WaiverRequest>,
    /// The period to calculate.
    pub period: PeriodRequest,
    /// Evaluation horizon override; defaults to the current date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for the `/salary/calculate-all` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCalculationRequest {
    /// The teachers to calculate.
    pub teachers: Vec<TeacherRequest>,
    /// Session events in or around the period, across all teachers.
    #[serde(default)]
    pub sessions: Vec<SessionEventRequest>,
    /// Bonuses across all teachers.
    #[serde(default)]
    pub bonuses: Vec<BonusRequest>,
    /// Active waivers.
    #[serde(default)]
    pub waivers: Vec<WaiverRequest>,
    /// The period to calculate.
    pub period: PeriodRequest,
    /// Evaluation horizon override; defaults to the current date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for the `/absences/detect` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectAbsencesRequest {
    /// The teacher to evaluate.
    pub teacher: TeacherRequest,
    /// Session events for the date.
    #[serde(default)]
    pub sessions: Vec<SessionEventRequest>,
    /// Active waivers.
    #[serde(default)]
    pub waivers: Vec<WaiverRequest>,
    /// The day to evaluate; must be strictly before `today`.
    pub date: NaiveDate,
    /// Evaluation horizon override; defaults to the current date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for the `/waivers/apply` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyWaiverRequest {
    /// The teacher the waiver applies to.
    pub teacher_id: String,
    /// First day covered (inclusive).
    pub start_date: NaiveDate,
    /// Last day covered (inclusive).
    pub end_date: NaiveDate,
    /// Which deduction type is waived.
    pub deduction_type: DeductionType,
    /// Why the waiver was granted.
    pub reason: String,
}

/// Request body for the `/cache/clear` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearCacheRequest {
    /// Clear one teacher's entries, or everything when omitted.
    #[serde(default)]
    pub teacher_id: Option<String>,
}

/// Teacher information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherRequest {
    /// Unique identifier for the teacher.
    pub id: String,
    /// The teacher's display name.
    pub name: String,
    /// Students currently assigned to this teacher.
    #[serde(default)]
    pub students: Vec<StudentRequest>,
}

/// Student information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRequest {
    /// Unique identifier for the student.
    pub id: String,
    /// The student's display name.
    pub name: String,
    /// The subscription package name.
    pub package: String,
    /// Raw day-package string describing scheduled weekdays.
    #[serde(default)]
    pub day_package: String,
    /// Enrollment status.
    pub status: StudentStatus,
    /// Scheduled time-of-day for this student's class.
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
}

/// Session event information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEventRequest {
    /// The teacher who held the session.
    pub teacher_id: String,
    /// The student the session was held for.
    pub student_id: String,
    /// When the session started.
    pub started_at: NaiveDateTime,
}

/// Bonus information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusRequest {
    /// The teacher the bonus was granted to.
    pub teacher_id: String,
    /// The date the bonus applies to.
    pub date: NaiveDate,
    /// The bonus amount.
    pub amount: Decimal,
    /// Why the bonus was granted.
    #[serde(default)]
    pub description: String,
}

/// Waiver information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiverRequest {
    /// The teacher the waiver applies to.
    pub teacher_id: String,
    /// Which deduction type is waived.
    pub deduction_type: DeductionType,
    /// First day covered (inclusive).
    pub start_date: NaiveDate,
    /// Last day covered (inclusive).
    pub end_date: NaiveDate,
    /// Why the waiver was granted.
    pub reason: String,
}

/// Period information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl From<TeacherRequest> for Teacher {
    fn from(req: TeacherRequest) -> Self {
        Teacher {
            id: req.id,
            name: req.name,
            students: req.students.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<StudentRequest> for Student {
    fn from(req: StudentRequest) -> Self {
        Student {
            id: req.id,
            name: req.name,
            package: req.package,
            day_package: req.day_package,
            status: req.status,
            scheduled_time: req.scheduled_time,
        }
    }
}

impl From<SessionEventRequest> for SessionEvent {
    fn from(req: SessionEventRequest) -> Self {
        SessionEvent {
            teacher_id: req.teacher_id,
            student_id: req.student_id,
            started_at: req.started_at,
        }
    }
}

impl From<BonusRequest> for BonusRecord {
    fn from(req: BonusRequest) -> Self {
        BonusRecord {
            teacher_id: req.teacher_id,
            date: req.date,
            amount: req.amount,
            description: req.description,
        }
    }
}

impl From<WaiverRequest> for Waiver {
    fn from(req: WaiverRequest) -> Self {
        Waiver {
            teacher_id: req.teacher_id,
            deduction_type: req.deduction_type,
            start_date: req.start_date,
            end_date: req.end_date,
            reason: req.reason,
        }
    }
}

impl From<PeriodRequest> for Period {
    fn from(req: PeriodRequest) -> Self {
        Period {
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}
