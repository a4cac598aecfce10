//! One unit struct per backend area; every call takes the shared [`ApiClient`].
//!
//! Request payloads are validated locally before anything goes on the wire.

pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod enrollment;
pub mod students;

pub use analytics::AnalyticsService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use enrollment::EnrollmentService;
pub use students::StudentService;

use validator::Validate;

use crate::error::ApiError;

pub(crate) fn validate<T: Validate>(payload: &T) -> Result<(), ApiError> {
    common::validation::check(payload).map_err(ApiError::Validation)
}
