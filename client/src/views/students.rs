use models::Student;
use std::sync::Arc;

use crate::{
    error::ApiError,
    query::keys,
    services::{
        StudentService,
        students::{SelfUpdate, StudentUpdate},
    },
    state::AppState,
};

impl AppState {
    pub async fn students(&self) -> Result<Arc<Vec<Student>>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::students::list(), move || StudentService::list(api))
            .await
    }

    pub async fn search_students(&self, term: &str) -> Result<Arc<Vec<Student>>, ApiError> {
        let term = term.trim();
        let api = self.api();
        self.queries()
            .fetch(&keys::students::search(term), move || {
                StudentService::search(api, term)
            })
            .await
    }

    pub async fn update_student(&self, student_id: i64, req: &StudentUpdate) -> Result<Student, ApiError> {
        let student = StudentService::update(self.api(), student_id, req).await?;
        self.queries().invalidate(&keys::students::all());
        Ok(student)
    }

    pub async fn delete_student(&self, student_id: i64) -> Result<Option<String>, ApiError> {
        let msg = StudentService::delete(self.api(), student_id).await?;
        self.queries().invalidate(&keys::students::all());
        Ok(msg)
    }

    pub async fn update_my_year(&self, year: i32) -> Result<Student, ApiError> {
        let student = StudentService::update_me(self.api(), &SelfUpdate { year }).await?;
        self.queries().invalidate(&keys::students::profile());
        Ok(student)
    }
}
