//! In-process stand-in for the attendance backend, served by axum on a random port.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

pub const SESSION_COOKIE: &str = "token=abc123";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct MockState {
    pub courses: HashMap<i64, Value>,
    pub course_sessions: HashMap<i64, Value>,
    pub student_sessions: HashMap<i64, Value>,
    pub roster: HashMap<i64, Value>,
    pub valid_code: String,
    /// The next N reads answer 503.
    pub fail_reads: usize,
    /// The next N mutations answer 503.
    pub fail_mutations: usize,
    pub reject_marks: bool,
    pub mark_delay: Duration,
    pub hits: HashMap<String, usize>,
    pub bodies: Vec<(String, Value)>,
}

pub type Shared = Arc<Mutex<MockState>>;

impl MockState {
    pub fn hits(&self, route: &str) -> usize {
        self.hits.get(route).copied().unwrap_or(0)
    }

    pub fn last_body(&self, route: &str) -> Option<Value> {
        self.bodies
            .iter()
            .rev()
            .find(|(r, _)| r == route)
            .map(|(_, b)| b.clone())
    }

    fn hit(&mut self, route: &str) {
        *self.hits.entry(route.to_owned()).or_default() += 1;
    }

    fn read_failure(&mut self) -> Option<Response> {
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Some(unavailable());
        }
        None
    }

    fn mutation_failure(&mut self) -> Option<Response> {
        if self.fail_mutations > 0 {
            self.fail_mutations -= 1;
            return Some(unavailable());
        }
        None
    }
}

fn ok(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn ack(message: &str) -> Response {
    Json(json!({"success": true, "message": message})).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

fn unavailable() -> Response {
    fail(StatusCode::SERVICE_UNAVAILABLE, "Service temporarily unavailable")
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains(SESSION_COOKIE))
}

async fn sign_in(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    s.lock().unwrap().hit("sign-in");
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if body["password"] != PASSWORD {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let role = if email.starts_with("admin") { "admin" } else { "student" };
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({
            "success": true,
            "data": {"user": {"id": 1, "email": email, "role": role}},
            "message": "Signed in"
        })),
    )
        .into_response()
}

/// Replies the way the sign-up endpoint does: `role` and `token` beside the envelope, no `data`.
async fn sign_up(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    {
        let mut st = s.lock().unwrap();
        st.hit("sign-up");
        st.bodies.push(("sign-up".into(), body.clone()));
    }
    if body["email"].as_str().is_some_and(|e| e.starts_with("taken")) {
        return fail(StatusCode::CONFLICT, "Email already registered");
    }
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({
            "success": true,
            "message": "Account created",
            "token": "t",
            "role": "student"
        })),
    )
        .into_response()
}

async fn logout(State(s): State<Shared>) -> Response {
    s.lock().unwrap().hit("logout");
    (
        [(header::SET_COOKIE, "token=; Path=/; Max-Age=0".to_owned())],
        ack("Logged out"),
    )
        .into_response()
}

async fn course(State(s): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("course");
    if let Some(r) = st.read_failure() {
        return r;
    }
    match st.courses.get(&id) {
        Some(c) => ok(c.clone()),
        None => fail(StatusCode::NOT_FOUND, "Course not found"),
    }
}

async fn update_course(
    State(s): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("update-course");
    st.bodies.push(("update-course".into(), body.clone()));
    if !st.courses.contains_key(&id) {
        return fail(StatusCode::NOT_FOUND, "Course not found");
    }
    let mut course = body;
    course["id"] = json!(id);
    st.courses.insert(id, course.clone());
    ok(course)
}

async fn course_students(State(s): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("course-students");
    let students = st.roster.get(&id).cloned().unwrap_or_else(|| json!([]));
    Json(json!({"success": true, "students": students})).into_response()
}

async fn course_sessions(State(s): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("course-sessions");
    if let Some(r) = st.read_failure() {
        return r;
    }
    ok(st.course_sessions.get(&id).cloned().unwrap_or_else(|| json!([])))
}

async fn student_sessions(
    State(s): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("student-sessions");
    if !signed_in(&headers) {
        return fail(StatusCode::UNAUTHORIZED, "Authentication required");
    }
    if let Some(r) = st.read_failure() {
        return r;
    }
    ok(st.student_sessions.get(&id).cloned().unwrap_or_else(|| json!([])))
}

async fn create_session(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("create-session");
    st.bodies.push(("create-session".into(), body));
    if let Some(r) = st.mutation_failure() {
        return r;
    }
    ack("Attendance created")
}

async fn mark_admin(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut st = s.lock().unwrap();
    st.hit("mark-admin");
    st.bodies.push(("mark-admin".into(), body));
    if let Some(r) = st.mutation_failure() {
        return r;
    }
    if st.reject_marks {
        return fail(StatusCode::BAD_REQUEST, "Student is not enrolled in this course");
    }
    ack("Attendance updated")
}

async fn mark_student(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let delay = {
        let mut st = s.lock().unwrap();
        st.hit("mark-student");
        st.bodies.push(("mark-student".into(), body.clone()));
        st.mark_delay
    };
    tokio::time::sleep(delay).await;

    let st = s.lock().unwrap();
    if body["code"] == st.valid_code.as_str() {
        ack("Attendance recorded")
    } else {
        fail(StatusCode::BAD_REQUEST, "Invalid or expired attendance code")
    }
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/sign-in", post(sign_in))
        .route("/api/sign-up", post(sign_up))
        .route("/api/logout", post(logout))
        .route("/api/course/{id}", get(course).put(update_course))
        .route("/api/course/students/{id}", get(course_students))
        .route("/api/attendance/", post(create_session))
        .route("/api/attendance/course/{id}", get(course_sessions))
        .route("/api/attendance/student/course/{id}", get(student_sessions))
        .route("/api/attendance/mark/admin", post(mark_admin))
        .route("/api/attendance/mark/student", post(mark_student))
        .with_state(state)
}

/// Spawns the mock on a random local port and returns its address with the shared state.
pub async fn spawn_backend(state: MockState) -> (SocketAddr, Shared) {
    let shared: Shared = Arc::new(Mutex::new(state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(shared.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, shared)
}
