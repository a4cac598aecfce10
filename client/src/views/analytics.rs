use models::analytics::{DailyOverview, Report};
use std::sync::Arc;

use crate::{
    error::ApiError,
    query::{QueryKey, keys},
    services::AnalyticsService,
    state::AppState,
};

/// Backend-owned analytics reports, rendered without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsReport {
    CourseList,
    AttendanceTrend,
    CoursesSummary,
    AtRiskStudents(i64),
    CourseAttendance(i64),
    SessionBreakdown(i64),
    StudentMonthly { student_id: i64, year: i32, month: u32 },
    CourseMonthly { course_id: i64, year: i32, month: u32 },
    Participation(i64),
    Department(String),
    SessionEffectiveness(i64),
    TopMetrics,
}

impl AnalyticsReport {
    pub fn key(&self) -> QueryKey {
        use keys::analytics as k;
        match self {
            Self::CourseList => k::course_list(),
            Self::AttendanceTrend => k::attendance_trend(),
            Self::CoursesSummary => k::courses_summary(),
            Self::AtRiskStudents(id) => k::at_risk_students(*id),
            Self::CourseAttendance(id) => k::course_attendance_analysis(*id),
            Self::SessionBreakdown(id) => k::session_breakdown(*id),
            Self::StudentMonthly {
                student_id,
                year,
                month,
            } => k::student_monthly(*student_id, *year, *month),
            Self::CourseMonthly {
                course_id,
                year,
                month,
            } => k::course_monthly(*course_id, *year, *month),
            Self::Participation(id) => k::participation(*id),
            Self::Department(name) => k::department(name),
            Self::SessionEffectiveness(id) => k::session_effectiveness(*id),
            Self::TopMetrics => k::top_metrics(),
        }
    }
}

impl AppState {
    pub async fn daily_overview(&self) -> Result<Arc<DailyOverview>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&keys::analytics::daily_overview(), move || {
                AnalyticsService::daily_overview(api)
            })
            .await
    }

    pub async fn analytics_report(&self, report: &AnalyticsReport) -> Result<Arc<Report>, ApiError> {
        let api = self.api();
        self.queries()
            .fetch(&report.key(), move || async move {
                use AnalyticsReport as R;
                match report {
                    R::CourseList => AnalyticsService::course_list(api).await,
                    R::AttendanceTrend => AnalyticsService::attendance_trend(api).await,
                    R::CoursesSummary => AnalyticsService::courses_summary(api).await,
                    R::AtRiskStudents(id) => AnalyticsService::at_risk_students(api, *id).await,
                    R::CourseAttendance(id) => {
                        AnalyticsService::course_attendance_analysis(api, *id).await
                    }
                    R::SessionBreakdown(id) => AnalyticsService::session_breakdown(api, *id).await,
                    R::StudentMonthly {
                        student_id,
                        year,
                        month,
                    } => AnalyticsService::student_monthly(api, *student_id, *year, *month).await,
                    R::CourseMonthly {
                        course_id,
                        year,
                        month,
                    } => AnalyticsService::course_monthly(api, *course_id, *year, *month).await,
                    R::Participation(id) => AnalyticsService::participation_insights(api, *id).await,
                    R::Department(name) => AnalyticsService::department_overview(api, name).await,
                    R::SessionEffectiveness(id) => {
                        AnalyticsService::session_effectiveness(api, *id).await
                    }
                    R::TopMetrics => AnalyticsService::top_metrics(api).await,
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_keys_live_under_analytics() {
        let reports = [
            AnalyticsReport::CourseList,
            AnalyticsReport::Department("Computer Science".into()),
            AnalyticsReport::CourseMonthly {
                course_id: 3,
                year: 2025,
                month: 3,
            },
        ];
        for r in &reports {
            assert!(r.key().starts_with(&keys::analytics::all()));
        }
        assert_ne!(
            AnalyticsReport::AtRiskStudents(1).key(),
            AnalyticsReport::Participation(1).key()
        );
    }
}
