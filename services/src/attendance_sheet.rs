//! Admin attendance sheet: students down the side, sessions across the top.

use chrono::{DateTime, Utc};
use models::{CourseSession, Student};
use serde::Serialize;

use crate::attendance_view::{RowStatus, chronological};
use crate::attendance_window::derive_status;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetColumn {
    pub session_id: i64,
    pub code: String,
    pub opened_at: Option<DateTime<Utc>>,
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub student_id: i64,
    pub id_number: String,
    pub name: String,
    /// One cell per column, in column order.
    pub cells: Vec<RowStatus>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AttendanceSheet {
    pub columns: Vec<SheetColumn>,
    pub rows: Vec<SheetRow>,
}

/// Builds the grid with the most recent session in the first column.
///
/// Students keep the order they were given in. A student missing from a
/// session's roster is treated as unmarked for that session.
pub fn build_attendance_sheet(
    students: &[Student],
    sessions: &[CourseSession],
    now: DateTime<Utc>,
    default_window_minutes: i64,
) -> AttendanceSheet {
    let mut ordered: Vec<&CourseSession> = sessions.iter().collect();
    ordered.sort_by(|a, b| chronological(&b.session, &a.session));

    let columns = ordered
        .iter()
        .map(|cs| {
            let mut column = SheetColumn {
                session_id: cs.session.id,
                code: cs.session.code.clone(),
                opened_at: cs.session.opened_at,
                present: 0,
                absent: 0,
                unmarked: 0,
            };
            for student in students {
                match cs.record_for(student.id).present {
                    Some(true) => column.present += 1,
                    Some(false) => column.absent += 1,
                    None => column.unmarked += 1,
                }
            }
            column
        })
        .collect();

    let rows = students
        .iter()
        .map(|student| SheetRow {
            student_id: student.id,
            id_number: student.id_number.clone(),
            name: student.display_name(),
            cells: ordered
                .iter()
                .map(|cs| {
                    let record = cs.record_for(student.id);
                    derive_status(&record, &cs.session, now, default_window_minutes)
                        .map(RowStatus::Known)
                        .unwrap_or(RowStatus::Unknown)
                })
                .collect(),
        })
        .collect();

    AttendanceSheet { columns, rows }
}
