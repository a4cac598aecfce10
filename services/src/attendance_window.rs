//! Attendance window evaluation.
//!
//! A session accepts marks from `opened_at` up to and including
//! `opened_at + window_minutes`. Everything here is pure: the caller samples
//! `now` once and passes it in.

use chrono::{DateTime, TimeDelta, Utc};
use models::{AttendanceRecord, AttendanceSession};
use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// Client-side label summarising one record against its session's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DerivedStatus {
    Present,
    Absent,
    Pending,
    Expired,
}

impl DerivedStatus {
    /// Whether a student may still act on a session in this state.
    pub fn is_open_for_submission(self) -> bool {
        matches!(self, DerivedStatus::Pending | DerivedStatus::Absent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("attendance session {session_id} has no usable start timestamp")]
    InvalidSessionData { session_id: i64 },
}

/// The resolved time span during which a session accepts marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendanceWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    pub minutes: i64,
}

impl AttendanceWindow {
    /// Resolves the window for `session`, preferring the session's own length over
    /// `default_minutes`.
    pub fn for_session(
        session: &AttendanceSession,
        default_minutes: i64,
    ) -> Result<Self, WindowError> {
        let opens_at = session.opened_at.ok_or(WindowError::InvalidSessionData {
            session_id: session.id,
        })?;
        let minutes = session.window_minutes.unwrap_or(default_minutes);

        // Non-positive windows close the moment they open.
        let closes_at = if minutes <= 0 {
            opens_at
        } else {
            TimeDelta::try_minutes(minutes)
                .and_then(|d| opens_at.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        };

        Ok(Self {
            opens_at,
            closes_at,
            minutes,
        })
    }

    /// Inclusive upper bound: `now == closes_at` is still open.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.minutes > 0 && now <= self.closes_at
    }
}

/// Display range `[opens_at, closes_at]` for a session.
pub fn window_range(
    session: &AttendanceSession,
    default_minutes: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), WindowError> {
    AttendanceWindow::for_session(session, default_minutes).map(|w| (w.opens_at, w.closes_at))
}

/// Derives the display status of `record` against `session` at `now`.
///
/// Explicit marks win over the window: a present record is `Present` and an
/// absent one `Absent` no matter the time, even if the session timestamp is bad.
pub fn derive_status(
    record: &AttendanceRecord,
    session: &AttendanceSession,
    now: DateTime<Utc>,
    default_minutes: i64,
) -> Result<DerivedStatus, WindowError> {
    match record.present {
        Some(true) => Ok(DerivedStatus::Present),
        Some(false) => Ok(DerivedStatus::Absent),
        None => {
            let window = AttendanceWindow::for_session(session, default_minutes)?;
            if window.is_open_at(now) {
                Ok(DerivedStatus::Pending)
            } else {
                Ok(DerivedStatus::Expired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const WINDOW: i64 = 10;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 8, 30, 0).unwrap()
    }

    fn session(opened_at: Option<DateTime<Utc>>, window_minutes: Option<i64>) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            course_id: Some(9),
            opened_at,
            code: "MA0825".into(),
            window_minutes,
        }
    }

    fn record(present: Option<bool>) -> AttendanceRecord {
        AttendanceRecord {
            session_id: 1,
            student_id: 5,
            present,
        }
    }

    #[test]
    fn present_wins_at_any_time() {
        let s = session(Some(t0()), None);
        for offset in [-60, 0, 3, 10, 11, 60 * 24 * 365] {
            let now = t0() + TimeDelta::minutes(offset);
            assert_eq!(
                derive_status(&record(Some(true)), &s, now, WINDOW),
                Ok(DerivedStatus::Present)
            );
        }
    }

    #[test]
    fn absent_wins_at_any_time() {
        let s = session(Some(t0()), None);
        for offset in [0, 5, 11, 10_000] {
            let now = t0() + TimeDelta::minutes(offset);
            assert_eq!(
                derive_status(&record(Some(false)), &s, now, WINDOW),
                Ok(DerivedStatus::Absent)
            );
        }
    }

    #[test]
    fn unset_is_pending_inside_window() {
        let s = session(Some(t0()), None);
        let now = t0() + TimeDelta::minutes(5);
        assert_eq!(derive_status(&record(None), &s, now, WINDOW), Ok(DerivedStatus::Pending));
    }

    #[test]
    fn unset_is_expired_after_window() {
        let s = session(Some(t0()), None);
        let now = t0() + TimeDelta::minutes(11);
        assert_eq!(derive_status(&record(None), &s, now, WINDOW), Ok(DerivedStatus::Expired));
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let s = session(Some(t0()), None);
        let edge = t0() + TimeDelta::minutes(WINDOW);
        assert_eq!(derive_status(&record(None), &s, edge, WINDOW), Ok(DerivedStatus::Pending));

        let just_after = edge + TimeDelta::milliseconds(1);
        assert_eq!(
            derive_status(&record(None), &s, just_after, WINDOW),
            Ok(DerivedStatus::Expired)
        );
    }

    #[test]
    fn session_window_overrides_default() {
        let s = session(Some(t0()), Some(30));
        let now = t0() + TimeDelta::minutes(20);
        assert_eq!(derive_status(&record(None), &s, now, WINDOW), Ok(DerivedStatus::Pending));
        assert_eq!(
            window_range(&s, WINDOW).unwrap(),
            (t0(), t0() + TimeDelta::minutes(30))
        );
    }

    #[test]
    fn non_positive_window_is_closed_from_the_start() {
        for minutes in [0, -5] {
            let s = session(Some(t0()), Some(minutes));
            assert_eq!(
                derive_status(&record(None), &s, t0(), WINDOW),
                Ok(DerivedStatus::Expired)
            );
            assert_eq!(window_range(&s, WINDOW).unwrap(), (t0(), t0()));
        }
    }

    #[test]
    fn missing_timestamp_is_invalid_unless_marked() {
        let s = session(None, None);
        assert_eq!(
            derive_status(&record(None), &s, t0(), WINDOW),
            Err(WindowError::InvalidSessionData { session_id: 1 })
        );
        assert_eq!(
            derive_status(&record(Some(true)), &s, t0(), WINDOW),
            Ok(DerivedStatus::Present)
        );
        assert!(window_range(&s, WINDOW).is_err());
    }

    #[test]
    fn huge_window_does_not_overflow() {
        let s = session(Some(t0()), Some(i64::MAX));
        let w = AttendanceWindow::for_session(&s, WINDOW).unwrap();
        assert_eq!(w.closes_at, DateTime::<Utc>::MAX_UTC);
        assert!(w.is_open_at(t0() + TimeDelta::days(365)));
    }

    #[test]
    fn status_labels() {
        assert_eq!(DerivedStatus::Expired.to_string(), "expired");
        assert!(DerivedStatus::Absent.is_open_for_submission());
        assert!(!DerivedStatus::Present.is_open_for_submission());
    }
}
