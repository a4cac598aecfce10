use models::{Role, auth::AuthData};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate;
use crate::{error::ApiError, http::ApiClient};

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Father name is required"))]
    pub father_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grand_father_name: Option<String>,
    #[validate(length(min = 1, message = "ID number is required"))]
    pub id_number: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[validate(range(min = 1, max = 7, message = "Year must be between 1 and 7"))]
    pub year: Option<i32>,
}

/// Sign-up replies are less regular than sign-in: `role` and `token` may sit
/// beside `data`, and `data` may be missing altogether.
#[derive(Debug, Deserialize)]
struct SignUpReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SignUpData>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
struct SignUpData {
    #[serde(default)]
    user: Option<SignUpUser>,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
struct SignUpUser {
    #[serde(default)]
    role: Option<Role>,
}

impl SignUpData {
    fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|u| u.role).or(self.role)
    }
}

impl SignUpReply {
    /// Role from the user object, then `data`, then the top level; a new account
    /// with none of them is a student.
    fn into_role(self) -> Result<Role, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected {
                message: self.message,
            });
        }
        Ok(self
            .data
            .as_ref()
            .and_then(SignUpData::role)
            .or(self.role)
            .unwrap_or(Role::Student))
    }
}

pub struct AuthService;

impl AuthService {
    pub async fn sign_in(api: &ApiClient, req: &SignInRequest) -> Result<AuthData, ApiError> {
        validate(req)?;
        api.send(Method::POST, "/sign-in", req).await
    }

    /// Returns the role the new account was created with.
    pub async fn sign_up(api: &ApiClient, req: &SignUpRequest) -> Result<Role, ApiError> {
        validate(req)?;
        let reply: SignUpReply = api.send_raw(Method::POST, "/sign-up", req).await?;
        reply.into_role()
    }

    pub async fn logout(api: &ApiClient) -> Result<Option<String>, ApiError> {
        api.send_ack::<()>(Method::POST, "/logout", None).await
    }
}
