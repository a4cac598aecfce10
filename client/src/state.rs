//! Client state container shared by the views and the CLI.
//!
//! Holds the HTTP client, the query cache, the persisted session store and the
//! submission dedupe set. Cheap to clone; clones share everything.

use common::config::Config;

use crate::{
    auth::{SessionContext, SessionStore},
    error::ApiError,
    http::ApiClient,
    query::{InFlight, QueryClient, QueryOptions},
};

#[derive(Clone)]
pub struct AppState {
    api: ApiClient,
    queries: QueryClient,
    session: SessionStore,
    inflight: InFlight,
    window_minutes: i64,
}

impl AppState {
    pub fn new(api: ApiClient, queries: QueryClient, session: SessionStore, window_minutes: i64) -> Self {
        Self {
            api,
            queries,
            session,
            inflight: InFlight::default(),
            window_minutes,
        }
    }

    /// Builds the state from config and replays any saved session cookie.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(config)?;
        let session = SessionStore::new(config.session_file());
        match session.load() {
            Ok(saved) => {
                if let Some(cookie) = saved.cookie.as_deref() {
                    api.restore_cookies(cookie);
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable session file"),
        }
        Ok(Self::new(
            api,
            QueryClient::new(QueryOptions::from_config(config)),
            session,
            config.attendance_window_minutes,
        ))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn inflight(&self) -> &InFlight {
        &self.inflight
    }

    /// Default attendance window applied when a session carries none.
    pub fn window_minutes(&self) -> i64 {
        self.window_minutes
    }

    pub fn context(&self) -> SessionContext {
        self.session.context()
    }
}
