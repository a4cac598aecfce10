use models::{CourseSession, StudentSessionEntry};
use reqwest::Method;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::validate;
use crate::{error::ApiError, http::ApiClient};

pub const MIN_WINDOW_MINUTES: i64 = 1;
pub const MAX_WINDOW_MINUTES: i64 = 120;

/// Uppercases and strips everything but ASCII letters and digits.
pub fn normalize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    let ok = (4..=6).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("code").with_message(Cow::Borrowed(
            "Attendance code must be 4 to 6 letters or digits",
        )))
    }
}

/// Body of `POST /attendance/`. Leaving `code` out lets the backend generate one.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub course_id: i64,
    #[validate(range(
        min = MIN_WINDOW_MINUTES,
        max = MAX_WINDOW_MINUTES,
        message = "Window must be between 1 and 120 minutes"
    ))]
    pub minutes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_code"))]
    pub code: Option<String>,
}

impl CreateSessionRequest {
    pub fn new(course_id: i64, minutes: i64, code: Option<&str>) -> Self {
        Self {
            course_id,
            minutes,
            code: code.map(normalize_code).filter(|c| !c.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMark {
    pub student_id: i64,
    pub attendance_id: i64,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentMark {
    pub attendance_id: i64,
    #[validate(custom(function = "validate_code"))]
    pub code: String,
}

impl StudentMark {
    pub fn new(attendance_id: i64, code: &str) -> Self {
        Self {
            attendance_id,
            code: normalize_code(code),
        }
    }
}

pub struct AttendanceService;

impl AttendanceService {
    pub async fn create_session(
        api: &ApiClient,
        req: &CreateSessionRequest,
    ) -> Result<Option<String>, ApiError> {
        validate(req)?;
        api.send_ack(Method::POST, "/attendance/", Some(req)).await
    }

    /// Every session of a course with each enrolled student's mark (admin).
    pub async fn course_sessions(
        api: &ApiClient,
        course_id: i64,
    ) -> Result<Vec<CourseSession>, ApiError> {
        let mut sessions: Vec<CourseSession> =
            api.get(&format!("/attendance/course/{course_id}")).await?;
        for s in &mut sessions {
            s.session.course_id.get_or_insert(course_id);
        }
        Ok(sessions)
    }

    /// The caller's own sessions and marks for a course (student).
    pub async fn my_sessions(
        api: &ApiClient,
        course_id: i64,
    ) -> Result<Vec<StudentSessionEntry>, ApiError> {
        let mut entries: Vec<StudentSessionEntry> = api
            .get(&format!("/attendance/student/course/{course_id}"))
            .await?;
        for e in &mut entries {
            e.attendance.course_id.get_or_insert(course_id);
        }
        Ok(entries)
    }

    pub async fn mark_admin(api: &ApiClient, mark: &AdminMark) -> Result<Option<String>, ApiError> {
        api.send_ack(Method::POST, "/attendance/mark/admin", Some(mark))
            .await
    }

    pub async fn mark_student(
        api: &ApiClient,
        mark: &StudentMark,
    ) -> Result<Option<String>, ApiError> {
        validate(mark)?;
        api.send_ack(Method::POST, "/attendance/mark/student", Some(mark))
            .await
    }
}
