use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Course {
    pub id: i64,
    #[serde(alias = "title", default)]
    pub course_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub enrollment_start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub enrollment_end_date: Option<DateTime<Utc>>,
}

/// One semester bucket of the student course catalogue (`GET /student/courses`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SemesterCourses {
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub courses: Vec<CatalogCourse>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogCourse {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default, alias = "isEnrolled")]
    pub enrolled: bool,
}
