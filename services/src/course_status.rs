use chrono::{DateTime, Utc};
use models::Course;
use serde::Serialize;
use strum::{Display, EnumString};

/// Where a course sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Upcoming,
    Current,
    Past,
}

impl CourseStatus {
    /// A course with a missing date is treated as running.
    pub fn derive(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        if end.is_some_and(|e| e < now) {
            CourseStatus::Past
        } else if start.is_some_and(|s| s > now) {
            CourseStatus::Upcoming
        } else {
            CourseStatus::Current
        }
    }

    pub fn of(course: &Course, now: DateTime<Utc>) -> Self {
        Self::derive(course.start_date, course.end_date, now)
    }
}

/// Filters by status (`None` keeps all) and a case-insensitive search over name
/// and description.
pub fn filter_courses<'a>(
    courses: &'a [Course],
    status: Option<CourseStatus>,
    search: &str,
    now: DateTime<Utc>,
) -> Vec<(&'a Course, CourseStatus)> {
    let needle = search.trim().to_lowercase();
    courses
        .iter()
        .map(|c| (c, CourseStatus::of(c, now)))
        .filter(|(_, s)| status.is_none_or(|wanted| wanted == *s))
        .filter(|(c, _)| {
            needle.is_empty()
                || c.course_name.to_lowercase().contains(&needle)
                || c.description.to_lowercase().contains(&needle)
        })
        .collect()
}
