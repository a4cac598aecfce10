use thiserror::Error;

use crate::auth::SessionStoreError;

/// Fallback shown when the backend gives no usable message.
pub const GENERIC_FAILURE: &str = "Request failed, please try again";

/// Every failure a backend call can end in, after envelope decoding.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("not signed in or session expired")]
    Unauthorized { message: Option<String> },

    #[error("server returned HTTP {status}")]
    Status { status: u16, message: Option<String> },

    /// `{"success": false}` from the backend.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Rejected { message: Option<String> },

    #[error("response was successful but carried no data")]
    MissingData,

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("a submission for session {session_id} is already in flight")]
    DuplicateSubmission { session_id: i64 },

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }

    /// Worth retrying a read: the backend never saw the request or fell over.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message for the user: the backend's own wording when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message: Some(m) }
            | ApiError::Status { message: Some(m), .. }
            | ApiError::Unauthorized { message: Some(m) }
                if !m.trim().is_empty() =>
            {
                m.clone()
            }
            ApiError::Unauthorized { .. } => "Please sign in again".into(),
            ApiError::Validation(m) => m.clone(),
            ApiError::DuplicateSubmission { .. } => {
                "Your previous submission is still being processed".into()
            }
            _ => GENERIC_FAILURE.into(),
        }
    }
}
