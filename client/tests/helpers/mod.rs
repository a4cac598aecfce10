#![allow(dead_code)]

pub mod mock_backend;

#[allow(unused_imports)]
pub use mock_backend::{MockState, PASSWORD, SESSION_COOKIE, Shared, spawn_backend};

use chrono::{DateTime, TimeDelta, Utc};
use client::{
    ApiClient, AppState,
    auth::{SessionStore, StoredSession},
    query::{QueryClient, QueryOptions},
};
use common::config::Config;
use models::Role;
use serde_json::{Value, json};
use std::{net::SocketAddr, path::Path, time::Duration};

pub const WINDOW: i64 = 10;

pub fn config_for(addr: SocketAddr, state_dir: &Path) -> Config {
    let mut cfg = Config::from_env();
    cfg.api_base_url = format!("http://{addr}/api");
    cfg.state_dir = state_dir.to_path_buf();
    cfg.attendance_window_minutes = WINDOW;
    cfg.query_retries = 1;
    cfg
}

/// Fresh client state against the mock, with retries that do not wait.
pub fn state_for(addr: SocketAddr, state_dir: &Path) -> AppState {
    let cfg = config_for(addr, state_dir);
    AppState::new(
        ApiClient::new(&cfg).unwrap(),
        QueryClient::new(QueryOptions {
            retry_delay: Duration::ZERO,
            ..QueryOptions::from_config(&cfg)
        }),
        SessionStore::new(cfg.session_file()),
        cfg.attendance_window_minutes,
    )
}

/// Same as [`state_for`], already signed in with `role`.
pub fn signed_in_state(addr: SocketAddr, state_dir: &Path, role: Role) -> AppState {
    let state = state_for(addr, state_dir);
    state.api().restore_cookies(SESSION_COOKIE);
    state
        .session()
        .save(&StoredSession {
            role: Some(role),
            email: None,
            cookie: Some(SESSION_COOKIE.into()),
        })
        .unwrap();
    state
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - TimeDelta::minutes(minutes)
}

pub fn course_json(id: i64) -> Value {
    json!({
        "id": id,
        "course_name": "Database Systems",
        "description": "Relational modelling and SQL",
        "start_date": "2025-02-01",
        "end_date": "2025-06-30"
    })
}

pub fn session_json(id: i64, opened_at: DateTime<Utc>, code: &str) -> Value {
    json!({"id": id, "date": opened_at.to_rfc3339(), "code": code})
}

pub fn student_entry(id: i64, opened_at: DateTime<Utc>, present: Option<bool>) -> Value {
    json!({"attendance": session_json(id, opened_at, "MA0825"), "present": present})
}

pub fn roster_student(id: i64, first: &str, present: Option<bool>) -> Value {
    json!({
        "id": id,
        "id_number": format!("UGR/{id}/15"),
        "first_name": first,
        "father_name": "Test",
        "StudentAttendance": {"present": present}
    })
}
