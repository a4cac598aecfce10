use models::{Course, Student, student::StudentProfile};
use std::sync::Arc;

use crate::{
    error::ApiError,
    query::keys,
    services::{CourseService, courses::CourseRequest},
    state::AppState,
};

impl AppState {
    pub async fn all_courses(&self) -> Result<Arc<Vec<Course>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::courses::list(), move || CourseService::list(api))
            .await
    }

    pub async fn my_courses(&self) -> Result<Arc<Vec<Course>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::courses::my(), move || CourseService::my_courses(api))
            .await
    }

    pub async fn course(&self, course_id: i64) -> Result<Arc<Course>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::courses::detail(course_id), move || {
                CourseService::get(api, course_id)
            })
            .await
    }

    pub async fn course_students(&self, course_id: i64) -> Result<Arc<Vec<Student>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::courses::students(course_id), move || {
                CourseService::students(api, course_id)
            })
            .await
    }

    /// The signed-in student's profile and semester catalogue.
    pub async fn my_profile(&self) -> Result<Arc<StudentProfile>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::students::profile(), move || CourseService::catalogue(api))
            .await
    }

    pub async fn create_course(&self, req: &CourseRequest) -> Result<Course, ApiError> {
        let course = CourseService::create(self.api(), req).await?;
        self.queries().invalidate(&keys::courses::list());
        Ok(course)
    }

    pub async fn update_course(&self, course_id: i64, req: &CourseRequest) -> Result<Course, ApiError> {
        let course = CourseService::update(self.api(), course_id, req).await?;
        self.queries().invalidate(&keys::courses::list());
        self.queries().invalidate(&keys::courses::detail(course_id));
        Ok(course)
    }

    pub async fn delete_course(&self, course_id: i64) -> Result<Option<String>, ApiError> {
        let msg = CourseService::delete(self.api(), course_id).await?;
        self.queries().invalidate(&keys::courses::list());
        self.queries().invalidate(&keys::courses::detail(course_id));
        Ok(msg)
    }
}
