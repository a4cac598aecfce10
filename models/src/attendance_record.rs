use serde::{Deserialize, Serialize};

/// One student's outcome for one session.
///
/// `present` is tri-state: `Some(true)` marked present, `Some(false)` explicitly
/// marked absent, `None` not marked yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    pub session_id: i64,
    pub student_id: i64,
    pub present: Option<bool>,
}

impl AttendanceRecord {
    pub fn unset(session_id: i64, student_id: i64) -> Self {
        Self {
            session_id,
            student_id,
            present: None,
        }
    }
}

/// Join-table payload nested under each student in the course session listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct StudentAttendance {
    #[serde(default)]
    pub present: Option<bool>,
}
