//! Screen-level operations over [`AppState`](crate::state::AppState): cached
//! reads, mutations with their cache invalidation, and the derived views the
//! front end renders.

mod analytics;
mod attendance;
mod auth;
mod courses;
mod enrollment;
mod students;

pub use analytics::AnalyticsReport;
pub use attendance::{StudentCourseView, SubmitOutcome};
