//! Session list aggregation.
//!
//! Turns fetched sessions and the caller's records into ordered display rows and
//! picks the single session, if any, a student can currently act on.

use chrono::{DateTime, Utc};
use models::{AttendanceRecord, AttendanceSession};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::attendance_window::{AttendanceWindow, DerivedStatus, derive_status};

/// Row order of a session list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionOrder {
    /// Oldest first; the last row is the most recent (student course detail).
    #[default]
    Chronological,
    /// Most recent first (admin dashboard, where the top card shows the code).
    ReverseChronological,
}

/// Status of one row; `Unknown` when the session timestamp could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Known(DerivedStatus),
    Unknown,
}

impl Serialize for RowStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowStatus::Known(status) => status.serialize(serializer),
            RowStatus::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl RowStatus {
    pub fn known(self) -> Option<DerivedStatus> {
        match self {
            RowStatus::Known(s) => Some(s),
            RowStatus::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub session_id: i64,
    pub code: String,
    pub opens_at: Option<DateTime<Utc>>,
    pub closes_at: Option<DateTime<Utc>>,
    pub status: RowStatus,
    pub actionable: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionView {
    pub rows: Vec<SessionRow>,
    pub actionable_session_id: Option<i64>,
}

/// Chronological comparison; sessions without a timestamp sort as oldest, ties by id.
pub(crate) fn chronological(a: &AttendanceSession, b: &AttendanceSession) -> Ordering {
    a.opened_at.cmp(&b.opened_at).then(a.id.cmp(&b.id))
}

/// Sorts sessions in place according to `order`.
pub fn order_sessions(sessions: &mut [AttendanceSession], order: SessionOrder) {
    sessions.sort_by(chronological);
    if order == SessionOrder::ReverseChronological {
        sessions.reverse();
    }
}

/// Builds the ordered view for one subject.
///
/// `records` are the subject's marks; a session without a record counts as unset.
/// Pass an empty slice for a session-level view (admin dashboard), where every
/// status then comes from the window alone. `now` is used for every row.
pub fn build_session_view(
    sessions: &[AttendanceSession],
    records: &[AttendanceRecord],
    now: DateTime<Utc>,
    order: SessionOrder,
    default_window_minutes: i64,
) -> SessionView {
    if sessions.is_empty() {
        return SessionView::default();
    }

    let mut by_session: HashMap<i64, &AttendanceRecord> = HashMap::with_capacity(records.len());
    for r in records {
        if by_session.insert(r.session_id, r).is_some() {
            tracing::warn!(
                session_id = r.session_id,
                "more than one record for session in a single view; keeping the last"
            );
        }
    }

    // Only sessions with a usable timestamp can be "most recent".
    let latest_id = sessions
        .iter()
        .filter(|s| s.opened_at.is_some())
        .max_by(|a, b| chronological(a, b))
        .map(|s| s.id);

    let mut ordered = sessions.to_vec();
    order_sessions(&mut ordered, order);

    let mut actionable_session_id = None;
    let rows = ordered
        .into_iter()
        .map(|session| {
            let record = by_session
                .get(&session.id)
                .map(|r| **r)
                .unwrap_or_else(|| AttendanceRecord::unset(session.id, 0));

            let status = match derive_status(&record, &session, now, default_window_minutes) {
                Ok(s) => RowStatus::Known(s),
                Err(e) => {
                    tracing::debug!(error = %e, "rendering session with unknown status");
                    RowStatus::Unknown
                }
            };

            let actionable = Some(session.id) == latest_id
                && status.known().is_some_and(DerivedStatus::is_open_for_submission);
            if actionable {
                actionable_session_id = Some(session.id);
            }

            let window = AttendanceWindow::for_session(&session, default_window_minutes).ok();
            SessionRow {
                session_id: session.id,
                code: session.code,
                opens_at: window.map(|w| w.opens_at),
                closes_at: window.map(|w| w.closes_at),
                status,
                actionable,
            }
        })
        .collect();

    SessionView {
        rows,
        actionable_session_id,
    }
}
