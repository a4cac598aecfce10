use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    attendance_record::{AttendanceRecord, StudentAttendance},
    student::Student,
    timestamp,
};

/// One admin-created attendance window for a course meeting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceSession {
    pub id: i64,
    /// Absent from some listings; filled in by the client from the request scope.
    #[serde(default, alias = "courseId")]
    pub course_id: Option<i64>,
    /// Window start. `None` when the backend sent a missing or malformed `date`.
    #[serde(rename = "date", default, deserialize_with = "timestamp::lenient")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub code: String,
    /// Window length chosen at creation, when the backend reports it.
    #[serde(default, alias = "minutes", alias = "windowMinutes")]
    pub window_minutes: Option<i64>,
}

/// A student row inside a course session listing (admin view).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub student: Student,
    #[serde(rename = "StudentAttendance", default)]
    pub attendance: Option<StudentAttendance>,
}

/// `GET /attendance/course/{id}` item: a session with every enrolled student's mark.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CourseSession {
    #[serde(flatten)]
    pub session: AttendanceSession,
    #[serde(default)]
    pub students: Vec<RosterEntry>,
}

impl CourseSession {
    /// Records for every listed student; students without a join row come back unset.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.students
            .iter()
            .map(|entry| AttendanceRecord {
                session_id: self.session.id,
                student_id: entry.student.id,
                present: entry.attendance.and_then(|a| a.present),
            })
            .collect()
    }

    pub fn record_for(&self, student_id: i64) -> AttendanceRecord {
        self.students
            .iter()
            .find(|e| e.student.id == student_id)
            .map(|e| AttendanceRecord {
                session_id: self.session.id,
                student_id,
                present: e.attendance.and_then(|a| a.present),
            })
            .unwrap_or_else(|| AttendanceRecord::unset(self.session.id, student_id))
    }

    /// Sets one student's mark in place. Returns `false` if the student is not listed.
    pub fn set_present(&mut self, student_id: i64, present: Option<bool>) -> bool {
        match self.students.iter_mut().find(|e| e.student.id == student_id) {
            Some(entry) => {
                entry.attendance = Some(StudentAttendance { present });
                true
            }
            None => false,
        }
    }
}

/// `GET /attendance/student/course/{id}` item: one session and the caller's own mark.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudentSessionEntry {
    pub attendance: AttendanceSession,
    #[serde(default)]
    pub present: Option<bool>,
}

impl StudentSessionEntry {
    pub fn record(&self, student_id: i64) -> AttendanceRecord {
        AttendanceRecord {
            session_id: self.attendance.id,
            student_id,
            present: self.present,
        }
    }
}
