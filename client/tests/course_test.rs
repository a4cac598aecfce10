mod helpers;

use chrono::NaiveDate;
use client::{ApiError, query::keys, services::courses::CourseRequest};
use helpers::*;
use models::Role;
use tempfile::tempdir;

const COURSE: i64 = 4;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(name: &str) -> CourseRequest {
    CourseRequest {
        course_name: name.into(),
        description: "Processes, scheduling and memory".into(),
        start_date: date(2025, 2, 1),
        end_date: date(2025, 6, 30),
        enrollment_start_date: date(2025, 1, 10),
        enrollment_end_date: date(2025, 2, 15),
    }
}

fn backend() -> MockState {
    let mut st = MockState::default();
    st.courses.insert(COURSE, course_json(COURSE));
    st
}

#[tokio::test]
async fn update_course_refreshes_the_cached_detail() {
    let (addr, backend) = spawn_backend(backend()).await;
    let dir = tempdir().unwrap();
    let state = signed_in_state(addr, dir.path(), Role::Admin);

    assert_eq!(state.course(COURSE).await.unwrap().course_name, "Database Systems");
    state.queries().set_query_data(&keys::courses::list(), 1u8);

    let updated = state
        .update_course(COURSE, &request("Operating Systems"))
        .await
        .unwrap();
    assert_eq!(updated.id, COURSE);
    assert_eq!(updated.course_name, "Operating Systems");

    let sent = backend.lock().unwrap().last_body("update-course").unwrap();
    assert_eq!(sent["enrollment_end_date"], "2025-02-15");

    assert_eq!(state.queries().is_stale(&keys::courses::list()), Some(true));
    assert_eq!(state.course(COURSE).await.unwrap().course_name, "Operating Systems");
    assert_eq!(backend.lock().unwrap().hits("course"), 2);
}

#[tokio::test]
async fn update_course_checks_dates_locally() {
    let (addr, backend) = spawn_backend(backend()).await;
    let dir = tempdir().unwrap();
    let state = signed_in_state(addr, dir.path(), Role::Admin);

    let mut req = request("Operating Systems");
    req.end_date = date(2025, 1, 1);
    match state.update_course(COURSE, &req).await {
        Err(ApiError::Validation(msg)) => assert_eq!(msg, "End date must be after start date"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(backend.lock().unwrap().hits("update-course"), 0);
}
