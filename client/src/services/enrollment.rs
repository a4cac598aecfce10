use reqwest::Method;
use serde::Serialize;

use models::enrollment::Enrollment;

use crate::{error::ApiError, http::ApiClient};

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelfEnrollment {
    course_id: i64,
}

pub struct EnrollmentService;

impl EnrollmentService {
    pub async fn enroll(api: &ApiClient, enrollment: &Enrollment) -> Result<Option<String>, ApiError> {
        api.send_ack(Method::POST, "/enrollment/", Some(enrollment))
            .await
    }

    /// `DELETE` with a JSON body, as the backend expects.
    pub async fn unenroll(
        api: &ApiClient,
        enrollment: &Enrollment,
    ) -> Result<Option<String>, ApiError> {
        api.send_ack(Method::DELETE, "/enrollment/", Some(enrollment))
            .await
    }

    pub async fn self_enroll(api: &ApiClient, course_id: i64) -> Result<Option<String>, ApiError> {
        api.send_ack(
            Method::POST,
            "/enrollment/self",
            Some(&SelfEnrollment { course_id }),
        )
        .await
    }
}
