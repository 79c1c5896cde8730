//! Student model and weekday scheduling patterns.
//!
//! This module defines the [`Student`] struct together with the
//! [`WeekdayPattern`] type that interprets a student's raw day-package
//! string (e.g. "Mon,Wed,Fri" or "all days").

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    /// The student is actively enrolled and has scheduled classes.
    Active,
    /// The student has left or been suspended; no classes are expected.
    Inactive,
    /// The student is registered but classes have not started yet.
    Pending,
}

/// Represents a student assigned to a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier for the student.
    pub id: String,
    /// The student's display name.
    pub name: String,
    /// The subscription package name (e.g., "standard").
    pub package: String,
    /// Raw day-package string describing scheduled weekdays.
    ///
    /// Interpreted by [`WeekdayPattern::parse`]; an empty or unrecognized
    /// value means the student is treated as scheduled every day.
    #[serde(default)]
    pub day_package: String,
    /// Enrollment status.
    pub status: StudentStatus,
    /// Scheduled time-of-day for this student's class, if configured.
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
}

impl Student {
    /// Returns true if the student is actively enrolled.
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// Parses this student's day-package string into a [`WeekdayPattern`].
    pub fn pattern(&self) -> WeekdayPattern {
        WeekdayPattern::parse(&self.day_package)
    }
}

/// The interpreted weekday schedule of a student.
///
/// Missing and unrecognized patterns deliberately fall back to
/// [`WeekdayPattern::AllDays`]-like behavior: a class that might have been
/// scheduled is treated as scheduled, so lateness and absence evaluation is
/// never silently skipped because of bad reference data. Unrecognized input
/// is retained so callers can surface it as a data-quality flag.
///
/// # Example
///
/// ```
/// use comp_engine::models::WeekdayPattern;
/// use chrono::NaiveDate;
///
/// let pattern = WeekdayPattern::parse("Mon,Wed,Fri");
/// // 2026-01-05 is a Monday, 2026-01-06 a Tuesday
/// assert!(pattern.matches(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()));
/// assert!(!pattern.matches(NaiveDate::from_ymd_opt(2026, 1, 6).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekdayPattern {
    /// Scheduled every day (explicit "all days" or an empty pattern).
    AllDays,
    /// Scheduled on exactly these weekdays.
    Days(Vec<Weekday>),
    /// The pattern string could not be interpreted; treated as every day.
    Unrecognized(String),
}

impl WeekdayPattern {
    /// Parses a raw day-package string.
    ///
    /// Matching rules, in priority order:
    /// - empty or whitespace-only input is scheduled every day
    /// - an explicit all-days token ("all", "all days", "daily", "everyday")
    ///   is scheduled every day
    /// - a comma- or slash-separated list of weekday names (full names or
    ///   common abbreviations, case-insensitive) matches exactly those days
    /// - anything else is [`WeekdayPattern::Unrecognized`] and matches every
    ///   day
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return WeekdayPattern::AllDays;
        }

        match trimmed.to_lowercase().as_str() {
            "all" | "all days" | "daily" | "everyday" | "every day" => {
                return WeekdayPattern::AllDays;
            }
            _ => {}
        }

        let mut days = Vec::new();
        for token in trimmed.split([',', '/']) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match parse_weekday(token) {
                Some(day) => {
                    if !days.contains(&day) {
                        days.push(day);
                    }
                }
                None => return WeekdayPattern::Unrecognized(raw.to_string()),
            }
        }

        if days.is_empty() {
            return WeekdayPattern::Unrecognized(raw.to_string());
        }

        WeekdayPattern::Days(days)
    }

    /// Returns true if a class is expected on the given date.
    ///
    /// Both [`WeekdayPattern::AllDays`] and [`WeekdayPattern::Unrecognized`]
    /// match every date.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            WeekdayPattern::AllDays | WeekdayPattern::Unrecognized(_) => true,
            WeekdayPattern::Days(days) => days.contains(&date.weekday()),
        }
    }

    /// Returns true if the original pattern string could not be interpreted.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, WeekdayPattern::Unrecognized(_))
    }
}

/// Maps a single weekday token to a [`Weekday`].
fn parse_weekday(token: &str) -> Option<Weekday> {
    match token.to_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
