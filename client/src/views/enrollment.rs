use models::{Student, enrollment::Enrollment};
use std::sync::Arc;

use crate::{
    error::ApiError,
    query::keys,
    services::{CourseService, EnrollmentService},
    state::AppState,
};

impl AppState {
    pub async fn enrolled_students(&self, course_id: i64) -> Result<Arc<Vec<Student>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::enrollments::by_course(course_id), move || {
                CourseService::students(api, course_id)
            })
            .await
    }

    fn invalidate_enrollment(&self, course_id: i64) {
        let q = self.queries();
        q.invalidate(&keys::enrollments::by_course(course_id));
        q.invalidate(&keys::courses::students(course_id));
        q.invalidate(&keys::courses::my());
    }

    pub async fn enroll(&self, student_id: i64, course_id: i64) -> Result<Option<String>, ApiError> {
        let msg = EnrollmentService::enroll(self.api(), &Enrollment { student_id, course_id }).await?;
        self.invalidate_enrollment(course_id);
        Ok(msg)
    }

    pub async fn unenroll(&self, student_id: i64, course_id: i64) -> Result<Option<String>, ApiError> {
        let msg =
            EnrollmentService::unenroll(self.api(), &Enrollment { student_id, course_id }).await?;
        self.invalidate_enrollment(course_id);
        Ok(msg)
    }

    pub async fn self_enroll(&self, course_id: i64) -> Result<Option<String>, ApiError> {
        let msg = EnrollmentService::self_enroll(self.api(), course_id).await?;
        self.queries().invalidate(&keys::courses::my());
        self.queries().invalidate(&keys::students::profile());
        Ok(msg)
    }
}
