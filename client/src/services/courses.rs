use chrono::NaiveDate;
use models::{Course, Student, student::StudentProfile};
use reqwest::Method;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::validate;
use crate::{error::ApiError, http::ApiClient};

/// Body of `POST /course` and `PUT /course/{id}`.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_course_dates"))]
pub struct CourseRequest {
    #[validate(length(min = 1, message = "Course name is required"))]
    pub course_name: String,
    #[validate(length(
        min = 1,
        max = 280,
        message = "Description must be between 1 and 280 characters"
    ))]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub enrollment_start_date: NaiveDate,
    pub enrollment_end_date: NaiveDate,
}

fn validate_course_dates(req: &CourseRequest) -> Result<(), ValidationError> {
    if req.end_date <= req.start_date {
        return Err(ValidationError::new("course_dates")
            .with_message(Cow::Borrowed("End date must be after start date")));
    }
    if req.enrollment_end_date <= req.enrollment_start_date {
        return Err(ValidationError::new("enrollment_dates").with_message(Cow::Borrowed(
            "Enrollment end date must be after start date",
        )));
    }
    Ok(())
}

pub struct CourseService;

impl CourseService {
    /// Every course (admin).
    pub async fn list(api: &ApiClient) -> Result<Vec<Course>, ApiError> {
        api.get("/course").await
    }

    /// Courses the signed-in student is enrolled in.
    pub async fn my_courses(api: &ApiClient) -> Result<Vec<Course>, ApiError> {
        api.get("/course/my").await
    }

    /// The signed-in student plus the catalogue grouped by semester.
    pub async fn catalogue(api: &ApiClient) -> Result<StudentProfile, ApiError> {
        api.get("/student/courses").await
    }

    pub async fn get(api: &ApiClient, course_id: i64) -> Result<Course, ApiError> {
        api.get(&format!("/course/{course_id}")).await
    }

    pub async fn create(api: &ApiClient, req: &CourseRequest) -> Result<Course, ApiError> {
        validate(req)?;
        api.send(Method::POST, "/course", req).await
    }

    pub async fn update(
        api: &ApiClient,
        course_id: i64,
        req: &CourseRequest,
    ) -> Result<Course, ApiError> {
        validate(req)?;
        api.send(Method::PUT, &format!("/course/{course_id}"), req)
            .await
    }

    pub async fn delete(api: &ApiClient, course_id: i64) -> Result<Option<String>, ApiError> {
        api.send_ack::<()>(Method::DELETE, &format!("/course/{course_id}"), None)
            .await
    }

    pub async fn students(api: &ApiClient, course_id: i64) -> Result<Vec<Student>, ApiError> {
        api.get(&format!("/course/students/{course_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn request() -> CourseRequest {
        CourseRequest {
            course_name: "Database Systems".into(),
            description: "Relational modelling and SQL".into(),
            start_date: date("2025-02-01"),
            end_date: date("2025-06-30"),
            enrollment_start_date: date("2025-01-10"),
            enrollment_end_date: date("2025-02-10"),
        }
    }

    #[test]
    fn valid_course_passes() {
        assert!(validate(&request()).is_ok());
    }

    #[test]
    fn end_must_follow_start() {
        let mut req = request();
        req.end_date = req.start_date;
        match validate(&req) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "End date must be after start date"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn long_description_is_rejected() {
        let mut req = request();
        req.description = "x".repeat(281);
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn dates_serialize_as_plain_dates() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["start_date"], "2025-02-01");
        assert_eq!(json["course_name"], "Database Systems");
    }
}
