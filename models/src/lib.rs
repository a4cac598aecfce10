//! Wire and domain types shared by the attendance services and the HTTP client.
//!
//! Field names follow the backend's JSON. Types are deliberately lenient on input:
//! missing optional fields default, and timestamps that cannot be parsed become
//! `None` so a single bad row never fails a whole list.

pub mod analytics;
pub mod attendance_record;
pub mod attendance_session;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod role;
pub mod student;
pub mod timestamp;

pub use attendance_record::{AttendanceRecord, StudentAttendance};
pub use attendance_session::{AttendanceSession, CourseSession, RosterEntry, StudentSessionEntry};
pub use course::Course;
pub use role::Role;
pub use student::Student;
