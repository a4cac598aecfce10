//! Role-based route guard. Advisory only: the backend re-checks every call.

use models::Role;
use std::fmt;

use super::session::{SessionContext, SessionStore, SessionStoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Student,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    SignUp,
    StudentCourses,
    StudentCourseDetail(i64),
    StudentAttendance,
    StudentSettings,
    AdminCourses,
    AdminCreateCourse,
    AdminCourseDetail(i64),
    AdminStudents,
    AdminEnrollment,
    AdminAnalytics,
}

impl Route {
    /// Where the guard sends callers it turns away.
    pub const ENTRY: Route = Route::Login;

    pub fn access(self) -> RouteAccess {
        match self {
            Route::Login | Route::SignUp => RouteAccess::Public,
            Route::StudentCourses
            | Route::StudentCourseDetail(_)
            | Route::StudentAttendance
            | Route::StudentSettings => RouteAccess::Student,
            Route::AdminCourses
            | Route::AdminCreateCourse
            | Route::AdminCourseDetail(_)
            | Route::AdminStudents
            | Route::AdminEnrollment
            | Route::AdminAnalytics => RouteAccess::Admin,
        }
    }

    pub fn path(self) -> String {
        match self {
            Route::Login => "/".into(),
            Route::SignUp => "/signup".into(),
            Route::StudentCourses => "/student/courses".into(),
            Route::StudentCourseDetail(id) => format!("/student/course/{id}"),
            Route::StudentAttendance => "/student/attendance".into(),
            Route::StudentSettings => "/student/settings".into(),
            Route::AdminCourses => "/admin/courses".into(),
            Route::AdminCreateCourse => "/admin/create-course".into(),
            Route::AdminCourseDetail(id) => format!("/admin/course/{id}"),
            Route::AdminStudents => "/admin/student-management".into(),
            Route::AdminEnrollment => "/admin/enroll-students".into(),
            Route::AdminAnalytics => "/admin/analytics".into(),
        }
    }

    /// Parses a path. `/admin` is an alias of the admin course list.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim().trim_end_matches('/').to_ascii_lowercase();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Login,
            ["signup"] => Route::SignUp,
            ["student", "courses"] => Route::StudentCourses,
            ["student", "course", id] => Route::StudentCourseDetail(id.parse().ok()?),
            ["student", "attendance"] => Route::StudentAttendance,
            ["student", "settings"] => Route::StudentSettings,
            ["admin"] | ["admin", "courses"] => Route::AdminCourses,
            ["admin", "create-course"] => Route::AdminCreateCourse,
            ["admin", "course", id] => Route::AdminCourseDetail(id.parse().ok()?),
            ["admin", "student-management"] => Route::AdminStudents,
            ["admin", "enroll-students"] => Route::AdminEnrollment,
            ["admin", "analytics"] => Route::AdminAnalytics,
            _ => return None,
        };
        Some(route)
    }

    /// Landing page after sign-in.
    pub fn home_for(role: Role) -> Route {
        if role.is_admin() {
            Route::AdminCourses
        } else {
            Route::StudentCourses
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow(Route),
    Redirect(Route),
}

pub fn can_access(route: Route, ctx: &SessionContext) -> bool {
    match route.access() {
        RouteAccess::Public => true,
        RouteAccess::Student => ctx.role == Some(Role::Student),
        RouteAccess::Admin => ctx.role.is_some_and(Role::is_admin),
    }
}

pub fn resolve(route: Route, ctx: &SessionContext) -> Navigation {
    if can_access(route, ctx) {
        Navigation::Allow(route)
    } else {
        tracing::debug!(%route, role = ?ctx.role, "route guard redirect");
        Navigation::Redirect(Route::ENTRY)
    }
}

/// Resolves a raw path; unknown paths and aliases redirect.
pub fn resolve_path(path: &str, ctx: &SessionContext) -> Navigation {
    match Route::from_path(path) {
        None => Navigation::Redirect(Route::ENTRY),
        Some(route) => match resolve(route, ctx) {
            Navigation::Allow(r) if !r.path().eq_ignore_ascii_case(path.trim_end_matches('/'))
                && r != Route::Login =>
            {
                Navigation::Redirect(r)
            }
            nav => nav,
        },
    }
}

/// Enters `route` against the stored session. Landing on sign-up signs the
/// current user out first.
pub fn enter(route: Route, store: &SessionStore) -> Result<Navigation, SessionStoreError> {
    if route == Route::SignUp {
        store.clear()?;
    }
    Ok(resolve(route, &store.context()))
}
