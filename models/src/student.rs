use serde::{Deserialize, Serialize};

use crate::course::SemesterCourses;

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub grand_father_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub dorm_block: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.father_name)
            .trim()
            .to_string()
    }
}

/// The signed-in student together with the course catalogue grouped by semester.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub semesters: Vec<SemesterCourses>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_tolerates_missing_parts() {
        let s = Student {
            id: 1,
            first_name: "Abebe".into(),
            ..Default::default()
        };
        assert_eq!(s.display_name(), "Abebe");
    }
}
