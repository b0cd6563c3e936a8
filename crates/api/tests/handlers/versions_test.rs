use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::TestContext;

async fn seeded() -> (TestContext, Vec<Uuid>) {
    let ctx = TestContext::new();
    let course = ctx.course("MA101", 30);
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);

    let mut ids = Vec::new();
    for (day, start, end) in [(1, "08:00", "10:00"), (2, "08:00", "10:00"), (3, "08:00", "10:00")] {
        ids.push(
            ctx.create_session(&ctx.placement(&course, &lecturer, &venue, day, start, end))
                .await,
        );
    }
    (ctx, ids)
}

#[tokio::test]
async fn test_publish_without_body() {
    let (ctx, ids) = seeded().await;

    let response = ctx.server.post(&ctx.semester_url("publish")).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "semester_id": ctx.semester_id,
            "version": 1,
            "sessions_published": ids.len(),
        })
    );
}

#[tokio::test]
async fn test_publish_rejects_malformed_body() {
    let (ctx, _) = seeded().await;

    for body in [r#"{"notes": "Draft for review""#, r#"{"published_by": "not-a-uuid"}"#] {
        ctx.server
            .post(&ctx.semester_url("publish"))
            .text(body)
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let ledger: Value = ctx.server.get(&ctx.semester_url("versions")).await.json();
    assert_eq!(ledger["versions"], json!([]));
}

#[tokio::test]
async fn test_publish_rollback_lifecycle() {
    let (ctx, _) = seeded().await;
    let publisher = Uuid::new_v4();

    ctx.server
        .post(&ctx.semester_url("publish"))
        .json(&json!({ "published_by": publisher, "notes": "Draft for review" }))
        .await
        .assert_status_ok();

    let course = ctx.course("PH101", 30);
    let lecturer = ctx.lecturer("Grace Hopper");
    let venue = ctx.venue("Room 12", 40);
    let late = ctx
        .create_session(&ctx.placement(&course, &lecturer, &venue, 4, "14:00", "16:00"))
        .await;

    let second: Value = ctx.server.post(&ctx.semester_url("publish")).await.json();
    assert_eq!(second["version"], json!(2));
    assert_eq!(second["sessions_published"], json!(1));

    let ledger: Value = ctx.server.get(&ctx.semester_url("versions")).await.json();
    let versions: Vec<Value> = ledger["versions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["version"].clone())
        .collect();
    assert_eq!(versions, vec![json!(1), json!(2)]);
    assert_eq!(ledger["versions"][0]["notes"], json!("Draft for review"));
    assert_eq!(ledger["versions"][0]["published_by"], json!(publisher));

    let response = ctx
        .server
        .post(&ctx.semester_url("rollback"))
        .json(&json!({ "version": 1 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["sessions_restored"], json!(3));

    let late_session = ctx
        .store
        .sessions()
        .into_iter()
        .find(|s| s.id == late)
        .unwrap();
    assert!(!late_session.is_published());
}

#[tokio::test]
async fn test_rollback_errors() {
    let (ctx, _) = seeded().await;
    ctx.server
        .post(&ctx.semester_url("publish"))
        .await
        .assert_status_ok();

    ctx.server
        .post(&ctx.semester_url("rollback"))
        .json(&json!({ "version": 5 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .post(&ctx.semester_url("rollback"))
        .json(&json!({ "version": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_published_session_cannot_be_edited() {
    let ctx = TestContext::new();
    let course = ctx.course("MA101", 30);
    let lecturer = ctx.lecturer("Ada Lovelace");
    let venue = ctx.venue("Hall A", 100);
    let id = ctx
        .create_session(&ctx.placement(&course, &lecturer, &venue, 1, "08:00", "10:00"))
        .await;
    ctx.server
        .post(&ctx.semester_url("publish"))
        .await
        .assert_status_ok();

    ctx.server
        .put(&format!("/api/timetable/sessions/{}", id))
        .json(&ctx.placement(&course, &lecturer, &venue, 2, "08:00", "10:00"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_ledger() {
    let ctx = TestContext::new();

    let response = ctx.server.get(&ctx.semester_url("versions")).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "semester_id": ctx.semester_id, "versions": [] })
    );
}
