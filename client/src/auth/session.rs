//! The persisted client session: the signed-in role (and the cookie that backs
//! it) stored as one small JSON file under the configured state directory.

use models::Role;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `Cookie` header value replayed on the next run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

/// Who the guard is deciding for. Built once from the store and passed in
/// explicitly; nothing reads the store behind the guard's back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub role: Option<Role>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }
}

impl From<&StoredSession> for SessionContext {
    fn from(s: &StoredSession) -> Self {
        Self { role: s.role }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty session.
    pub fn load(&self) -> Result<StoredSession, SessionStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), SessionStoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Context for the guard. An unreadable store counts as signed out.
    pub fn context(&self) -> SessionContext {
        match self.load() {
            Ok(s) => SessionContext::from(&s),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "treating unreadable session as signed out");
                SessionContext::anonymous()
            }
        }
    }
}
