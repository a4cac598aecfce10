use chrono::Utc;
use models::{Course, CourseSession, StudentAttendance, StudentSessionEntry};
use serde::Serialize;
use services::{AttendanceSheet, SessionOrder, SessionView, build_attendance_sheet, build_session_view};
use std::sync::Arc;

use crate::{
    error::ApiError,
    query::keys,
    services::{
        AttendanceService,
        attendance::{AdminMark, CreateSessionRequest, StudentMark},
    },
    state::AppState,
};

/// Records returned by the student listing belong to the caller, whose id the
/// client does not know; the aggregator only keys on session id.
const SELF_ID: i64 = 0;

#[derive(Debug, Clone)]
pub struct StudentCourseView {
    pub course: Arc<Course>,
    pub sessions: SessionView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub session_id: i64,
    pub message: Option<String>,
}

impl AppState {
    fn invalidate_attendance(&self, course_id: i64) {
        self.queries()
            .invalidate(&keys::attendance::by_course(course_id));
        self.queries()
            .invalidate(&keys::attendance::student_by_course(course_id));
    }

    /// Every session of a course with its roster marks (admin).
    pub async fn course_sessions(&self, course_id: i64) -> Result<Arc<Vec<CourseSession>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::attendance::by_course(course_id), move || {
                AttendanceService::course_sessions(api, course_id)
            })
            .await
    }

    /// The caller's own sessions for a course (student).
    pub async fn my_sessions(
        &self,
        course_id: i64,
    ) -> Result<Arc<Vec<StudentSessionEntry>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::attendance::student_by_course(course_id), move || {
                AttendanceService::my_sessions(api, course_id)
            })
            .await
    }

    /// Student course detail: course and sessions load concurrently, rows oldest first.
    pub async fn student_course_view(&self, course_id: i64) -> Result<StudentCourseView, ApiError> {
        let (course, entries) = tokio::try_join!(self.course(course_id), self.my_sessions(course_id))?;

        let sessions: Vec<_> = entries.iter().map(|e| e.attendance.clone()).collect();
        let records: Vec<_> = entries.iter().map(|e| e.record(SELF_ID)).collect();
        let now = Utc::now();
        let view = build_session_view(
            &sessions,
            &records,
            now,
            SessionOrder::Chronological,
            self.window_minutes(),
        );
        tracing::debug!(course_id, rows = view.rows.len(), actionable = ?view.actionable_session_id, "built student session view");
        Ok(StudentCourseView {
            course,
            sessions: view,
        })
    }

    /// Admin dashboard list: most recent session first, status from the window alone.
    pub async fn admin_session_view(&self, course_id: i64) -> Result<SessionView, ApiError> {
        let listing = self.course_sessions(course_id).await?;
        let sessions: Vec<_> = listing.iter().map(|cs| cs.session.clone()).collect();
        Ok(build_session_view(
            &sessions,
            &[],
            Utc::now(),
            SessionOrder::ReverseChronological,
            self.window_minutes(),
        ))
    }

    pub async fn attendance_sheet(&self, course_id: i64) -> Result<AttendanceSheet, ApiError> {
        let (students, sessions) = tokio::try_join!(
            self.course_students(course_id),
            self.course_sessions(course_id)
        )?;
        Ok(build_attendance_sheet(
            &students,
            &sessions,
            Utc::now(),
            self.window_minutes(),
        ))
    }

    /// Opens a new session. `minutes` defaults to the configured window.
    pub async fn open_session(
        &self,
        course_id: i64,
        minutes: Option<i64>,
        code: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        let req = CreateSessionRequest::new(
            course_id,
            minutes.unwrap_or(self.window_minutes()),
            code,
        );
        let msg = AttendanceService::create_session(self.api(), &req).await?;
        self.invalidate_attendance(course_id);
        tracing::info!(course_id, minutes = req.minutes, "attendance session opened");
        Ok(msg)
    }

    /// Submits `code` for the course's actionable session, if there is one.
    ///
    /// A second submission for the same session while the first is in flight
    /// fails with [`ApiError::DuplicateSubmission`].
    pub async fn submit_code(&self, course_id: i64, code: &str) -> Result<SubmitOutcome, ApiError> {
        let view = self.student_course_view(course_id).await?;
        let session_id = view.sessions.actionable_session_id.ok_or_else(|| {
            ApiError::Validation("No attendance session is open for submission".into())
        })?;

        let _claim = self.inflight().claim(session_id)?;
        let mark = StudentMark::new(session_id, code);
        let result = AttendanceService::mark_student(self.api(), &mark).await;
        if !matches!(result, Err(ApiError::Validation(_))) {
            self.invalidate_attendance(course_id);
        }
        let message = result?;
        tracing::info!(course_id, session_id, "attendance code accepted");
        Ok(SubmitOutcome {
            session_id,
            message,
        })
    }

    /// Marks one student in one session, showing the new mark before the backend confirms.
    ///
    /// The cached course listing is updated in place for that single record and
    /// rolled back if the call fails.
    pub async fn mark_attendance(
        &self,
        course_id: i64,
        session_id: i64,
        student_id: i64,
        present: bool,
    ) -> Result<Option<String>, ApiError> {
        let key = keys::attendance::by_course(course_id);
        let mark = AdminMark {
            student_id,
            attendance_id: session_id,
            present,
        };
        let api = self.api();
        let msg = self
            .queries()
            .mutate_optimistic(
                &key,
                |sessions: &mut Vec<CourseSession>| {
                    sessions
                        .iter_mut()
                        .find(|cs| cs.session.id == session_id)?
                        .students
                        .iter_mut()
                        .find(|entry| entry.student.id == student_id)
                        .map(|entry| &mut entry.attendance)
                },
                Some(StudentAttendance {
                    present: Some(present),
                }),
                || AttendanceService::mark_admin(api, &mark),
            )
            .await?;
        self.queries()
            .invalidate(&keys::attendance::student_by_course(course_id));
        Ok(msg)
    }
}
