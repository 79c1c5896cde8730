//! Teacher model.

use serde::{Deserialize, Serialize};

use super::Student;

/// Represents a teacher whose compensation is being calculated.
///
/// A teacher carries the roster of currently assigned students; historical
/// assignment changes are resolved by the caller before the engine runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique identifier for the teacher.
    pub id: String,
    /// The teacher's display name.
    pub name: String,
    /// Students currently assigned to this teacher.
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Teacher {
    /// Returns the actively enrolled students on this teacher's roster.
    ///
    /// Inactive and pending students have no expected classes, so they are
    /// excluded from signal extraction and compensation.
    pub fn active_students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter().filter(|s| s.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentStatus;

    fn student(id: &str, status: StudentStatus) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {id}"),
            package: "standard".to_string(),
            day_package: "all".to_string(),
            status,
            scheduled_time: None,
        }
    }

    #[test]
    fn test_active_students_filters_by_status() {
        let teacher = Teacher {
            id: "tch_001".to_string(),
            name: "Yusuf Rahman".to_string(),
            students: vec![
                student("stu_001", StudentStatus::Active),
                student("stu_002", StudentStatus::Inactive),
                student("stu_003", StudentStatus::Pending),
                student("stu_004", StudentStatus::Active),
            ],
        };

        let active: Vec<&str> = teacher.active_students().map(|s| s.id.as_str()).collect();
        assert_eq!(active, vec!["stu_001", "stu_004"]);
    }

    #[test]
    fn test_teacher_deserialization_with_empty_roster() {
        let json = r#"{"id": "tch_001", "name": "Yusuf Rahman"}"#;
        let teacher: Teacher = serde_json::from_str(json).unwrap();
        assert!(teacher.students.is_empty());
    }
}
