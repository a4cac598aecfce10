//! Pure attendance domain logic: window evaluation, session list aggregation,
//! the admin attendance sheet, and course status derivation.
//!
//! Nothing here performs I/O; callers sample `now` once and pass it down.

pub mod attendance_sheet;
pub mod attendance_view;
pub mod attendance_window;
pub mod course_status;

pub use attendance_sheet::{AttendanceSheet, build_attendance_sheet};
pub use attendance_view::{RowStatus, SessionOrder, SessionRow, SessionView, build_session_view};
pub use attendance_window::{AttendanceWindow, DerivedStatus, WindowError, derive_status, window_range};
pub use course_status::{CourseStatus, filter_courses};
