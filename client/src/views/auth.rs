use models::Role;

use crate::{
    auth::StoredSession,
    error::ApiError,
    services::{
        AuthService,
        auth::{SignInRequest, SignUpRequest},
    },
    state::AppState,
};

impl AppState {
    fn remember(&self, role: Role, email: &str) -> Result<(), ApiError> {
        self.session().save(&StoredSession {
            role: Some(role),
            email: Some(email.to_owned()),
            cookie: self.api().cookie_header(),
        })?;
        Ok(())
    }

    /// Signs in, persists the role and session cookie, and starts from an empty cache.
    pub async fn login(&self, email: &str, password: &str) -> Result<Role, ApiError> {
        let req = SignInRequest {
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        let data = AuthService::sign_in(self.api(), &req).await?;
        self.queries().clear();
        self.remember(data.user.role, &req.email)?;
        tracing::info!(role = %data.user.role, "signed in");
        Ok(data.user.role)
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<Role, ApiError> {
        let role = AuthService::sign_up(self.api(), req).await?;
        self.queries().clear();
        self.remember(role, &req.email)?;
        tracing::info!(%role, "account created");
        Ok(role)
    }

    /// Local state is dropped even when the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let remote = AuthService::logout(self.api()).await;
        self.queries().clear();
        self.session().clear()?;
        match remote {
            Ok(_) => {
                tracing::info!("signed out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "backend logout failed; local session cleared anyway");
                Err(e)
            }
        }
    }
}
