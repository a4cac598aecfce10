//! Hierarchical cache keys. Invalidating a key also invalidates every key it
//! is a prefix of, so `attendance::all()` drops every attendance listing.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self(segments.into_iter().map(|s| s.to_string()).collect())
    }

    /// Returns a new key with `segment` appended.
    pub fn child(&self, segment: impl ToString) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

pub mod attendance {
    use super::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new(["attendance"])
    }

    pub fn by_course(course_id: i64) -> QueryKey {
        all().child("course").child(course_id)
    }

    pub fn student_by_course(course_id: i64) -> QueryKey {
        all().child("student").child("course").child(course_id)
    }
}

pub mod courses {
    use super::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new(["courses"])
    }

    pub fn list() -> QueryKey {
        all().child("list")
    }

    pub fn my() -> QueryKey {
        all().child("my")
    }

    pub fn detail(course_id: i64) -> QueryKey {
        all().child("detail").child(course_id)
    }

    pub fn students(course_id: i64) -> QueryKey {
        all().child("students").child(course_id)
    }
}

pub mod enrollments {
    use super::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new(["enrollments"])
    }

    pub fn by_course(course_id: i64) -> QueryKey {
        all().child("course").child(course_id)
    }
}

pub mod students {
    use super::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new(["students"])
    }

    pub fn list() -> QueryKey {
        all().child("list")
    }

    pub fn search(term: &str) -> QueryKey {
        all().child("search").child(term)
    }

    pub fn profile() -> QueryKey {
        QueryKey::new(["student", "profile", "me"])
    }
}

pub mod analytics {
    use super::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new(["analytics"])
    }

    pub fn daily_overview() -> QueryKey {
        all().child("daily-overview")
    }

    pub fn course_list() -> QueryKey {
        all().child("course-list")
    }

    pub fn attendance_trend() -> QueryKey {
        all().child("attendance-trend")
    }

    pub fn courses_summary() -> QueryKey {
        all().child("courses-summary")
    }

    pub fn at_risk_students(course_id: i64) -> QueryKey {
        all().child("at-risk-students").child(course_id)
    }

    pub fn course_attendance_analysis(course_id: i64) -> QueryKey {
        all().child("course-attendance-analysis").child(course_id)
    }

    pub fn session_breakdown(session_id: i64) -> QueryKey {
        all().child("attendance-breakdown").child(session_id)
    }

    pub fn student_monthly(student_id: i64, year: i32, month: u32) -> QueryKey {
        all()
            .child("student-monthly")
            .child(student_id)
            .child(year)
            .child(month)
    }

    pub fn course_monthly(course_id: i64, year: i32, month: u32) -> QueryKey {
        all()
            .child("course-monthly")
            .child(course_id)
            .child(year)
            .child(month)
    }

    pub fn participation(course_id: i64) -> QueryKey {
        all().child("course-participation").child(course_id)
    }

    pub fn department(name: &str) -> QueryKey {
        all().child("department").child(name)
    }

    pub fn session_effectiveness(course_id: i64) -> QueryKey {
        all().child("session-effectiveness").child(course_id)
    }

    pub fn top_metrics() -> QueryKey {
        all().child("top-metrics")
    }
}
