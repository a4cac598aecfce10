//! Read-only admin analytics. Apart from the daily overview the payloads are
//! rendered as-is, so they stay untyped JSON.

use models::analytics::{DailyOverview, Report};
use serde::Serialize;

use crate::{
    error::ApiError,
    http::{ApiClient, encode_path},
};

#[derive(Debug, Clone, Copy, Serialize)]
struct MonthQuery {
    year: i32,
    month: u32,
}

fn month_query(year: i32, month: u32) -> Result<MonthQuery, ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation(
            "Month must be between 1 and 12".into(),
        ));
    }
    Ok(MonthQuery { year, month })
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn daily_overview(api: &ApiClient) -> Result<DailyOverview, ApiError> {
        api.get("/analytics/daily/overview").await
    }

    pub async fn course_list(api: &ApiClient) -> Result<Report, ApiError> {
        api.get("/analytics/courses").await
    }

    pub async fn attendance_trend(api: &ApiClient) -> Result<Report, ApiError> {
        api.get("/analytics/attendance-trend").await
    }

    pub async fn courses_summary(api: &ApiClient) -> Result<Report, ApiError> {
        api.get("/analytics/courses/summary").await
    }

    pub async fn at_risk_students(api: &ApiClient, course_id: i64) -> Result<Report, ApiError> {
        api.get(&format!("/analytics/courses/{course_id}/at-risk-students"))
            .await
    }

    pub async fn course_attendance_analysis(
        api: &ApiClient,
        course_id: i64,
    ) -> Result<Report, ApiError> {
        api.get(&format!("/analytics/courses/{course_id}/attendance-analysis"))
            .await
    }

    pub async fn session_breakdown(api: &ApiClient, session_id: i64) -> Result<Report, ApiError> {
        api.get(&format!("/analytics/attendance/{session_id}/breakdown"))
            .await
    }

    pub async fn student_monthly(
        api: &ApiClient,
        student_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Report, ApiError> {
        let query = month_query(year, month)?;
        api.get_with_query(&format!("/analytics/students/{student_id}/monthly"), &query)
            .await
    }

    pub async fn course_monthly(
        api: &ApiClient,
        course_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Report, ApiError> {
        let query = month_query(year, month)?;
        api.get_with_query(
            &format!("/analytics/courses/{course_id}/monthly-summary"),
            &query,
        )
        .await
    }

    pub async fn participation_insights(
        api: &ApiClient,
        course_id: i64,
    ) -> Result<Report, ApiError> {
        api.get(&format!(
            "/analytics/courses/{course_id}/participation-insights"
        ))
        .await
    }

    pub async fn department_overview(api: &ApiClient, department: &str) -> Result<Report, ApiError> {
        let path = encode_path(&["analytics", "departments", department.trim(), "overview"])?;
        api.get(&path).await
    }

    pub async fn session_effectiveness(
        api: &ApiClient,
        course_id: i64,
    ) -> Result<Report, ApiError> {
        api.get(&format!(
            "/analytics/courses/{course_id}/session-effectiveness"
        ))
        .await
    }

    pub async fn top_metrics(api: &ApiClient) -> Result<Report, ApiError> {
        api.get("/analytics/top-metrics").await
    }
}
