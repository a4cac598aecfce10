use serde::{Deserialize, Serialize};

/// Today's headline numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DailyOverview {
    #[serde(default)]
    pub total_sessions_today: i64,
    #[serde(default)]
    pub total_students_present_today: i64,
    #[serde(default)]
    pub total_students_absent_today: i64,
    #[serde(default)]
    pub today_rate: f64,
}

impl DailyOverview {
    /// Attendance rate clamped to `0..=100` for display.
    pub fn display_rate(&self) -> f64 {
        self.today_rate.clamp(0.0, 100.0)
    }
}

/// Aggregates whose shape is owned by the backend and only rendered, never interpreted.
pub type Report = serde_json::Value;
