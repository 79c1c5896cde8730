//! Compensation aggregation.
//!
//! Combines base pay, lateness deductions, absence deductions, bonuses, and
//! waivers into one [`CompensationBreakdown`] per teacher per period. The
//! aggregate totals and the per-student itemization are produced by the same
//! pass, so summing the itemized lines always reproduces the totals.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use super::absence::compute_absence;
use super::base_pay::{daily_rate, working_days_in_period};
use super::lateness::compute_lateness;
use super::round_currency;
use super::signals::student_day_signals;
use super::waivers::find_waiver;
use crate::error::EngineResult;
use crate::models::{
    AbsenceLine, BatchError, BatchSummary, BonusRecord, CalculationWarning,
    CompensationBreakdown, DailyPayLine, DeductionType, LatenessLine, Period, SessionEvent,
    Student, StudentBreakdown, Teacher, Waiver,
};
use crate::policy::Policy;

/// Calculates the full compensation breakdown for one teacher.
///
/// Base pay accrues per student per teaching day (a day with a session
/// event) at `monthly_rate / working_days_in_period`. Lateness is evaluated
/// for scheduled days where the session started after the scheduled time;
/// absence for scheduled days with no session at all. Bonuses inside the
/// period are added verbatim.
///
/// Net salary is returned raw; it can be negative, and flooring it at zero
/// is a presentation decision left to the caller.
///
/// A missing package rate or an unrecognized weekday pattern never aborts
/// the calculation: the student stays in the itemization with a flag, and a
/// warning is attached to the breakdown.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidDateRange`] if the period is
/// inverted.
pub fn calculate_teacher_salary(
    teacher: &Teacher,
    sessions: &[SessionEvent],
    bonuses: &[BonusRecord],
    waivers: &[Waiver],
    period: &Period,
    policy: &Policy,
    today: NaiveDate,
) -> EngineResult<CompensationBreakdown> {
    period.validate()?;

    let working_days =
        working_days_in_period(period.start_date, period.end_date, policy.include_sundays());

    let mut students = Vec::new();
    let mut warnings = Vec::new();
    let mut base_salary = Decimal::ZERO;
    let mut lateness_total = Decimal::ZERO;
    let mut absence_total = Decimal::ZERO;

    for student in teacher.active_students() {
        let breakdown = calculate_student(
            teacher,
            student,
            sessions,
            waivers,
            period,
            policy,
            working_days,
            today,
        );

        if breakdown.rate_missing {
            warn!(
                teacher_id = %teacher.id,
                student_id = %student.id,
                package = %student.package,
                "Package rate missing; student contributes zero to base pay"
            );
            warnings.push(CalculationWarning {
                code: "RATE_MISSING".to_string(),
                message: format!(
                    "No rate found for package '{}' of student {}; contribution recorded as zero",
                    student.package, student.id
                ),
                severity: "medium".to_string(),
            });
        }
        if breakdown.pattern_unrecognized {
            warnings.push(CalculationWarning {
                code: "PATTERN_UNRECOGNIZED".to_string(),
                message: format!(
                    "Unrecognized weekday pattern '{}' for student {}; treated as scheduled every day",
                    student.day_package, student.id
                ),
                severity: "low".to_string(),
            });
        }

        base_salary += breakdown.base_pay;
        lateness_total += breakdown.lateness_total;
        absence_total += breakdown.absence_total;
        students.push(breakdown);
    }

    let bonus_total: Decimal = bonuses
        .iter()
        .filter(|b| b.teacher_id == teacher.id && period.contains_date(b.date))
        .map(|b| b.amount)
        .sum();

    let base_salary = round_currency(base_salary);
    let bonus_total = round_currency(bonus_total);
    let net_salary = base_salary - lateness_total - absence_total + bonus_total;

    Ok(CompensationBreakdown {
        calculation_id: Uuid::new_v4(),
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        policy_version: policy.version().to_string(),
        teacher_id: teacher.id.clone(),
        teacher_name: teacher.name.clone(),
        period: *period,
        working_days,
        student_count: students.len(),
        students,
        base_salary,
        lateness_total,
        absence_total,
        bonus_total,
        net_salary,
        warnings,
    })
}

/// Calculates one student's itemized contribution.
#[allow(clippy::too_many_arguments)]
fn calculate_student(
    teacher: &Teacher,
    student: &Student,
    sessions: &[SessionEvent],
    waivers: &[Waiver],
    period: &Period,
    policy: &Policy,
    working_days: u32,
    today: NaiveDate,
) -> StudentBreakdown {
    let (rate_missing, monthly_rate, lateness_base, absence_base) =
        match policy.package(&student.package) {
            Ok(package) => (
                false,
                package.monthly_rate,
                package.lateness_base,
                package.absence_base,
            ),
            Err(_) => (true, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

    let rate = daily_rate(monthly_rate, working_days);
    let signals = student_day_signals(student, sessions, period.start_date, period.end_date);

    let mut teaching_days = Vec::new();
    let mut lateness_lines = Vec::new();
    let mut absence_lines = Vec::new();
    let mut base_pay = Decimal::ZERO;
    let mut lateness_total = Decimal::ZERO;
    let mut absence_total = Decimal::ZERO;
    let mut pattern_unrecognized = false;

    for signal in &signals {
        pattern_unrecognized |= signal.pattern_unrecognized;

        match signal.actual_start {
            Some(actual) => {
                // Teaching day: base pay accrues whether or not the day was
                // on the student's schedule.
                base_pay += rate;
                teaching_days.push(DailyPayLine {
                    date: signal.date,
                    amount: rate,
                });

                if signal.scheduled {
                    if let Some(scheduled_time) = signal.scheduled_time {
                        let scheduled = signal.date.and_time(scheduled_time);
                        let assessment =
                            compute_lateness(scheduled, actual, lateness_base, policy);
                        if assessment.minutes_late > 0 {
                            let waived = find_waiver(
                                waivers,
                                &teacher.id,
                                signal.date,
                                DeductionType::Lateness,
                            )
                            .is_some();
                            let amount = if waived { Decimal::ZERO } else { assessment.amount };
                            lateness_total += amount;
                            lateness_lines.push(LatenessLine {
                                date: signal.date,
                                minutes_late: assessment.minutes_late,
                                tier: assessment.tier,
                                deduction_percent: assessment.deduction_percent,
                                amount,
                                waived,
                            });
                        }
                    }
                }
            }
            None => {
                let waiver =
                    find_waiver(waivers, &teacher.id, signal.date, DeductionType::Absence);
                let outcome = compute_absence(signal, policy, absence_base, waiver, today);
                if outcome.is_absent {
                    absence_total += outcome.deduction;
                    absence_lines.push(AbsenceLine {
                        date: signal.date,
                        amount: outcome.deduction,
                    });
                }
            }
        }
    }

    StudentBreakdown {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        package: student.package.clone(),
        daily_rate: rate,
        rate_missing,
        pattern_unrecognized,
        teaching_days,
        base_pay,
        lateness: lateness_lines,
        lateness_total,
        absences: absence_lines,
        absence_total,
    }
}

/// Calculates salaries for many teachers with per-teacher failure isolation.
///
/// One teacher's error never aborts the batch: the failure is recorded in
/// the returned [`BatchSummary`] and the remaining teachers are still
/// processed.
pub fn calculate_all_teacher_salaries(
    teachers: &[Teacher],
    sessions: &[SessionEvent],
    bonuses: &[BonusRecord],
    waivers: &[Waiver],
    period: &Period,
    policy: &Policy,
    today: NaiveDate,
) -> (Vec<CompensationBreakdown>, BatchSummary) {
    let mut breakdowns = Vec::new();
    let mut errors = Vec::new();

    for teacher in teachers {
        match calculate_teacher_salary(
            teacher, sessions, bonuses, waivers, period, policy, today,
        ) {
            Ok(breakdown) => breakdowns.push(breakdown),
            Err(err) => {
                warn!(
                    teacher_id = %teacher.id,
                    error = %err,
                    "Skipping teacher after calculation failure"
                );
                errors.push(BatchError {
                    teacher_id: teacher.id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let summary = BatchSummary {
        processed: breakdowns.len(),
        errored: errors.len(),
        errors,
    };
    (breakdowns, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentStatus;
    use crate::policy::{LatenessTier, Package};
    use chrono::NaiveTime;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tier(start: i64, end: i64, percent: &str) -> LatenessTier {
        LatenessTier {
            start_minutes: start,
            end_minutes: end,
            deduction_percent: dec(percent),
        }
    }

    fn create_test_policy() -> Policy {
        let mut packages = HashMap::new();
        packages.insert(
            "standard".to_string(),
            Package {
                monthly_rate: dec("3000"),
                lateness_base: dec("30"),
                absence_base: dec("45"),
            },
        );
        Policy::new(
            "test/2026-01-01".to_string(),
            packages,
            vec![tier(4, 7, "10"), tier(8, 14, "20"), tier(15, 21, "30")],
            3,
            false,
            vec![],
        )
        .unwrap()
    }

    fn create_student(id: &str, package: &str, day_package: &str) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {id}"),
            package: package.to_string(),
            day_package: day_package.to_string(),
            status: StudentStatus::Active,
            scheduled_time: NaiveTime::from_hms_opt(15, 0, 0),
        }
    }

    fn create_teacher(students: Vec<Student>) -> Teacher {
        Teacher {
            id: "tch_001".to_string(),
            name: "Yusuf Rahman".to_string(),
            students,
        }
    }

    fn session_at(student_id: &str, day: &str, time: (u32, u32)) -> SessionEvent {
        SessionEvent {
            teacher_id: "tch_001".to_string(),
            student_id: student_id.to_string(),
            started_at: date(day).and_hms_opt(time.0, time.1, 0).unwrap(),
        }
    }

    /// January 1-30, 2026: 26 working days with Sundays excluded.
    fn standard_period() -> Period {
        Period {
            start_date: date("2026-01-01"),
            end_date: date("2026-01-30"),
        }
    }

    /// Twenty non-Sunday teaching days in January 2026.
    fn twenty_teaching_days() -> Vec<&'static str> {
        vec![
            "2026-01-01", "2026-01-02", "2026-01-03", "2026-01-05", "2026-01-06",
            "2026-01-07", "2026-01-08", "2026-01-09", "2026-01-10", "2026-01-12",
            "2026-01-13", "2026-01-14", "2026-01-15", "2026-01-16", "2026-01-17",
            "2026-01-19", "2026-01-20", "2026-01-21", "2026-01-22", "2026-01-23",
        ]
    }

    /// AG-001: base pay prorates the monthly rate over working days and
    /// accrues only on teaching days.
    #[test]
    fn test_base_pay_proration() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        let sessions: Vec<SessionEvent> = twenty_teaching_days()
            .iter()
            .map(|d| session_at("stu_001", d, (15, 0)))
            .collect();

        // Today is before the period, so absence never triggers and base
        // pay is observed in isolation.
        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        assert_eq!(result.working_days, 26);
        assert_eq!(result.base_salary, dec("2307.69"));
        assert_eq!(result.lateness_total, Decimal::ZERO);
        assert_eq!(result.absence_total, Decimal::ZERO);
        assert_eq!(result.net_salary, dec("2307.69"));
        assert_eq!(result.students[0].teaching_days.len(), 20);
    }

    /// AG-002: the itemized teaching-day lines reproduce the base salary.
    #[test]
    fn test_itemization_reproduces_base_salary() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        let sessions: Vec<SessionEvent> = twenty_teaching_days()
            .iter()
            .map(|d| session_at("stu_001", d, (15, 0)))
            .collect();

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        let from_lines: Decimal = result
            .students
            .iter()
            .flat_map(|s| s.teaching_days.iter())
            .map(|line| line.amount)
            .sum();
        assert_eq!(round_currency(from_lines), result.base_salary);

        let lateness_from_lines: Decimal = result
            .students
            .iter()
            .flat_map(|s| s.lateness.iter())
            .map(|line| line.amount)
            .sum();
        assert_eq!(lateness_from_lines, result.lateness_total);

        let absences_from_lines: Decimal = result
            .students
            .iter()
            .flat_map(|s| s.absences.iter())
            .map(|line| line.amount)
            .sum();
        assert_eq!(absences_from_lines, result.absence_total);
    }

    /// AG-003: late starts deduct by tier and show up as lines.
    #[test]
    fn test_lateness_deduction_accrues() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        let sessions = vec![
            session_at("stu_001", "2026-01-05", (15, 10)), // Tier 2: 6.00
            session_at("stu_001", "2026-01-06", (15, 2)),  // Excused
            session_at("stu_001", "2026-01-07", (15, 50)), // > Max Tier: 30.00
        ];

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        assert_eq!(result.lateness_total, dec("36.00"));
        let lines = &result.students[0].lateness;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].tier, "Tier 2");
        assert_eq!(lines[0].amount, dec("6.00"));
        assert_eq!(lines[1].tier, "Excused");
        assert_eq!(lines[1].amount, Decimal::ZERO);
        assert_eq!(lines[2].tier, "> Max Tier");
        assert_eq!(lines[2].amount, dec("30.00"));
    }

    /// AG-004: absences deduct the flat package base per missed day.
    #[test]
    fn test_absence_deduction_accrues() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "Mon,Wed,Fri")]);
        // Sessions on Monday the 5th and Friday the 9th; Wednesday the 7th
        // is missed. Today is the 9th, so only days through the 8th are
        // evaluated.
        let sessions = vec![
            session_at("stu_001", "2026-01-05", (15, 0)),
            session_at("stu_001", "2026-01-09", (15, 0)),
        ];
        let period = Period {
            start_date: date("2026-01-05"),
            end_date: date("2026-01-09"),
        };

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &[],
            &period,
            &create_test_policy(),
            date("2026-01-09"),
        )
        .unwrap();

        assert_eq!(result.absence_total, dec("45.00"));
        assert_eq!(result.students[0].absences.len(), 1);
        assert_eq!(result.students[0].absences[0].date, date("2026-01-07"));
        // 5 working days; 2 teaching days.
        assert_eq!(result.working_days, 5);
        assert_eq!(result.base_salary, dec("1200.00"));
        assert_eq!(result.net_salary, dec("1155.00"));
    }

    /// AG-005: a lateness waiver zeroes the matching deduction and leaves
    /// unrelated deductions untouched.
    #[test]
    fn test_lateness_waiver_zeroes_only_matching_days() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        let sessions = vec![
            session_at("stu_001", "2026-01-05", (15, 10)),
            session_at("stu_001", "2026-01-12", (15, 10)),
        ];
        let waivers = vec![Waiver {
            teacher_id: "tch_001".to_string(),
            deduction_type: DeductionType::Lateness,
            start_date: date("2026-01-05"),
            end_date: date("2026-01-05"),
            reason: "transport strike".to_string(),
        }];

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &waivers,
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        let lines = &result.students[0].lateness;
        assert!(lines[0].waived);
        assert_eq!(lines[0].amount, Decimal::ZERO);
        assert!(!lines[1].waived);
        assert_eq!(lines[1].amount, dec("6.00"));
        assert_eq!(result.lateness_total, dec("6.00"));
    }

    /// AG-006: an absence waiver suppresses the deduction.
    #[test]
    fn test_absence_waiver_suppresses_deduction() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "Mon,Wed,Fri")]);
        let sessions = vec![session_at("stu_001", "2026-01-05", (15, 0))];
        let waivers = vec![Waiver {
            teacher_id: "tch_001".to_string(),
            deduction_type: DeductionType::Absence,
            start_date: date("2026-01-07"),
            end_date: date("2026-01-07"),
            reason: "school closure".to_string(),
        }];
        let period = Period {
            start_date: date("2026-01-05"),
            end_date: date("2026-01-07"),
        };

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &waivers,
            &period,
            &create_test_policy(),
            date("2026-01-09"),
        )
        .unwrap();

        assert_eq!(result.absence_total, Decimal::ZERO);
        assert!(result.students[0].absences.is_empty());
    }

    /// AG-007: bonuses in the period add verbatim; outside dates are
    /// ignored.
    #[test]
    fn test_bonuses_added_verbatim() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        let bonuses = vec![
            BonusRecord {
                teacher_id: "tch_001".to_string(),
                date: date("2026-01-15"),
                amount: dec("150.00"),
                description: "retention".to_string(),
            },
            BonusRecord {
                teacher_id: "tch_001".to_string(),
                date: date("2026-02-15"),
                amount: dec("999.00"),
                description: "outside period".to_string(),
            },
            BonusRecord {
                teacher_id: "tch_002".to_string(),
                date: date("2026-01-15"),
                amount: dec("999.00"),
                description: "other teacher".to_string(),
            },
        ];

        let result = calculate_teacher_salary(
            &teacher,
            &[],
            &bonuses,
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        assert_eq!(result.bonus_total, dec("150.00"));
        assert_eq!(result.net_salary, dec("150.00"));
    }

    /// AG-008: a missing package rate flags the student instead of
    /// aborting, and net salary can go negative.
    #[test]
    fn test_missing_package_rate_is_flagged_not_fatal() {
        let teacher = create_teacher(vec![
            create_student("stu_001", "platinum", "Mon,Wed,Fri"),
            create_student("stu_002", "standard", "Mon,Wed,Fri"),
        ]);
        let sessions = vec![session_at("stu_002", "2026-01-05", (15, 0))];
        let period = Period {
            start_date: date("2026-01-05"),
            end_date: date("2026-01-07"),
        };

        let result = calculate_teacher_salary(
            &teacher,
            &sessions,
            &[],
            &[],
            &period,
            &create_test_policy(),
            date("2026-01-09"),
        )
        .unwrap();

        assert_eq!(result.student_count, 2);
        let flagged = &result.students[0];
        assert!(flagged.rate_missing);
        assert_eq!(flagged.base_pay, Decimal::ZERO);
        // Absent days for the unknown package deduct zero.
        assert_eq!(flagged.absence_total, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.code == "RATE_MISSING"));
    }

    /// AG-009: net salary is returned raw when deductions exceed base.
    #[test]
    fn test_net_salary_can_be_negative() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "all")]);
        // No sessions at all: every non-Sunday day before today is absent.
        let period = Period {
            start_date: date("2026-01-05"),
            end_date: date("2026-01-09"),
        };

        let result = calculate_teacher_salary(
            &teacher,
            &[],
            &[],
            &[],
            &period,
            &create_test_policy(),
            date("2026-01-10"),
        )
        .unwrap();

        assert_eq!(result.base_salary, Decimal::ZERO);
        assert_eq!(result.absence_total, dec("225.00"));
        assert_eq!(result.net_salary, dec("-225.00"));
    }

    #[test]
    fn test_invalid_period_is_rejected() {
        let teacher = create_teacher(vec![]);
        let period = Period {
            start_date: date("2026-02-01"),
            end_date: date("2026-01-01"),
        };
        let result = calculate_teacher_salary(
            &teacher,
            &[],
            &[],
            &[],
            &period,
            &create_test_policy(),
            date("2026-03-01"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unrecognized_pattern_warns_and_flags() {
        let teacher = create_teacher(vec![create_student("stu_001", "standard", "whenever")]);
        let result = calculate_teacher_salary(
            &teacher,
            &[],
            &[],
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        )
        .unwrap();

        assert!(result.students[0].pattern_unrecognized);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == "PATTERN_UNRECOGNIZED"));
    }

    #[test]
    fn test_batch_processes_all_teachers() {
        let teachers = vec![
            create_teacher(vec![create_student("stu_001", "standard", "all")]),
            Teacher {
                id: "tch_002".to_string(),
                name: "Noor Aziz".to_string(),
                students: vec![create_student("stu_002", "standard", "all")],
            },
        ];

        let (breakdowns, summary) = calculate_all_teacher_salaries(
            &teachers,
            &[],
            &[],
            &[],
            &standard_period(),
            &create_test_policy(),
            date("2026-01-01"),
        );

        assert_eq!(breakdowns.len(), 2);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errored, 0);
    }
}
