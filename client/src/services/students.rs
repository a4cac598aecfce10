use models::Student;
use reqwest::Method;
use serde::Serialize;
use validator::Validate;

use super::validate;
use crate::{
    error::ApiError,
    http::{ApiClient, encode_path},
};

/// Admin edit of a student's year and department.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct StudentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 7, message = "Year must be between 1 and 7"))]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Department cannot be empty"))]
    pub department: Option<String>,
}

/// Students may only change their own year.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SelfUpdate {
    #[validate(range(min = 1, max = 7, message = "Year must be between 1 and 7"))]
    pub year: i32,
}

pub struct StudentService;

impl StudentService {
    pub async fn list(api: &ApiClient) -> Result<Vec<Student>, ApiError> {
        api.get("/student/all").await
    }

    /// Blank terms are rejected locally; the backend route needs a path segment.
    pub async fn search(api: &ApiClient, term: &str) -> Result<Vec<Student>, ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ApiError::Validation("Search term is required".into()));
        }
        api.get(&encode_path(&["student", "search", term])?).await
    }

    pub async fn update(
        api: &ApiClient,
        student_id: i64,
        req: &StudentUpdate,
    ) -> Result<Student, ApiError> {
        validate(req)?;
        api.send(Method::PUT, &format!("/student/admin/update/{student_id}"), req)
            .await
    }

    pub async fn delete(api: &ApiClient, student_id: i64) -> Result<Option<String>, ApiError> {
        api.send_ack::<()>(
            Method::DELETE,
            &format!("/student/admin/delete/{student_id}"),
            None,
        )
        .await
    }

    pub async fn update_me(api: &ApiClient, req: &SelfUpdate) -> Result<Student, ApiError> {
        validate(req)?;
        api.send(Method::PUT, "/student/update/me", req).await
    }
}
