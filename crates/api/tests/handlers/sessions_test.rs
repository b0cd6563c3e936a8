use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use unitime_db::mock::MockTimetableStore;
use uuid::Uuid;

use crate::test_utils::{TestContext, server_for};

#[tokio::test]
async fn test_check_conflicts_reports_each_kind() {
    let ctx = TestContext::new();
    let (math, physics) = (ctx.course("MA101", 30), ctx.course("PH101", 30));
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);
    let student = Uuid::new_v4();
    ctx.store.register(student, math.id, ctx.semester_id);
    ctx.store.register(student, physics.id, ctx.semester_id);

    let existing = ctx
        .create_session(&ctx.placement(&math, &lecturer, &venue, 1, "08:00", "10:00"))
        .await;

    let mut body = ctx.placement(&physics, &lecturer, &venue, 1, "09:00", "11:00");
    body["exclude_session_id"] = Value::Null;
    let response = ctx.server.post("/api/timetable/conflicts").json(&body).await;

    response.assert_status_ok();
    let report: Value = response.json();
    assert_eq!(report["has_conflicts"], json!(true));
    let kinds: Vec<&str> = report["conflicts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["VENUE", "LECTURER", "STUDENT"]);
    assert_eq!(report["conflicts"][2]["overlapping_students"], json!(1));
    assert_eq!(report["conflicts"][0]["conflicting_session_id"], json!(existing));
}

#[tokio::test]
async fn test_back_to_back_sessions_do_not_conflict() {
    let ctx = TestContext::new();
    let (math, physics) = (ctx.course("MA101", 30), ctx.course("PH101", 30));
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);
    ctx.create_session(&ctx.placement(&math, &lecturer, &venue, 1, "08:00", "10:00"))
        .await;

    let response = ctx
        .server
        .post("/api/timetable/conflicts")
        .json(&ctx.placement(&physics, &lecturer, &venue, 1, "10:00", "12:00"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "has_conflicts": false, "conflicts": [] })
    );
}

#[tokio::test]
async fn test_check_conflicts_rejects_reversed_interval() {
    let ctx = TestContext::new();
    let course = ctx.course("MA101", 30);
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);

    let response = ctx
        .server
        .post("/api/timetable/conflicts")
        .json(&ctx.placement(&course, &lecturer, &venue, 1, "11:00", "10:00"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_session_returns_conflicts() {
    let ctx = TestContext::new();
    let (math, physics) = (ctx.course("MA101", 30), ctx.course("PH101", 30));
    let (ada, grace) = (ctx.lecturer("Ada Lovelace"), ctx.lecturer("Grace Hopper"));
    let venue = ctx.venue("Hall A", 100);
    ctx.create_session(&ctx.placement(&math, &ada, &venue, 2, "08:00", "10:00"))
        .await;

    let response = ctx
        .server
        .post("/api/timetable/sessions")
        .json(&ctx.placement(&physics, &grace, &venue, 2, "09:30", "10:30"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["conflicts"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["conflicts"][0]["type"], json!("VENUE"));
    assert_eq!(ctx.store.sessions().len(), 1);
}

#[tokio::test]
async fn test_update_session_moves_draft() {
    let ctx = TestContext::new();
    let course = ctx.course("MA101", 30);
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);
    let id = ctx
        .create_session(&ctx.placement(&course, &lecturer, &venue, 1, "08:00", "10:00"))
        .await;

    let response = ctx
        .server
        .put(&format!("/api/timetable/sessions/{}", id))
        .json(&ctx.placement(&course, &lecturer, &venue, 3, "14:00", "16:00"))
        .await;

    response.assert_status_ok();
    let session: Value = response.json();
    assert_eq!(session["day_of_week"], json!(3));
    assert_eq!(session["time"], json!({ "start": "14:00", "end": "16:00" }));
    assert_eq!(session["status"], json!("DRAFT"));
}

#[tokio::test]
async fn test_update_unknown_session() {
    let ctx = TestContext::new();
    let course = ctx.course("MA101", 30);
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);

    let response = ctx
        .server
        .put(&format!("/api/timetable/sessions/{}", Uuid::new_v4()))
        .json(&ctx.placement(&course, &lecturer, &venue, 1, "08:00", "10:00"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let mut store = MockTimetableStore::new();
    store
        .expect_find_sessions()
        .returning(|_| Err(eyre::eyre!("connection refused").into()));
    store
        .expect_active_registrations()
        .returning(|_, _| Ok(vec![]));
    let server = server_for(Arc::new(store));

    let response = server
        .post("/api/timetable/conflicts")
        .json(&json!({
            "course_id": Uuid::new_v4(),
            "lecturer_id": Uuid::new_v4(),
            "venue_id": Uuid::new_v4(),
            "semester_id": Uuid::new_v4(),
            "day_of_week": 1,
            "start_time": "08:00",
            "end_time": "10:00",
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Database error:"));
}
