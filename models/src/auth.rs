use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

/// `data` of a successful sign-in or sign-up.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthData {
    pub user: UserSummary,
}
