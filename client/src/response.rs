use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::ApiError;

/// Standard envelope wrapping every backend JSON response:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// Decoding is the single place where `success`, `data` and `message` are
/// interpreted; callers only ever see `Result<T, ApiError>`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    /// Some listings (`/course/students/{id}`) name their payload `students`.
    #[serde(alias = "students")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload, failing on `success: false` or a missing `data`.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.message,
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

impl ApiResponse<IgnoredAny> {
    /// For endpoints whose payload does not matter: returns the message on success.
    pub fn into_ack(self) -> Result<Option<String>, ApiError> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::Rejected {
                message: self.message,
            })
        }
    }
}
