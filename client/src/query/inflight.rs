use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use crate::error::ApiError;

/// Sessions with a student code submission currently on the wire.
#[derive(Clone, Default)]
pub struct InFlight {
    sessions: Arc<Mutex<HashSet<i64>>>,
}

/// Held for the duration of one submission; releases the session on drop.
#[must_use]
pub struct InFlightGuard {
    sessions: Arc<Mutex<HashSet<i64>>>,
    session_id: i64,
}

impl InFlight {
    /// Claims `session_id`, or fails if a submission for it is already outstanding.
    pub fn claim(&self, session_id: i64) -> Result<InFlightGuard, ApiError> {
        let mut set = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(session_id) {
            tracing::info!(session_id, "rejecting duplicate attendance submission");
            return Err(ApiError::DuplicateSubmission { session_id });
        }
        Ok(InFlightGuard {
            sessions: self.sessions.clone(),
            session_id,
        })
    }

    pub fn contains(&self, session_id: i64) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&session_id)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session_id);
    }
}
