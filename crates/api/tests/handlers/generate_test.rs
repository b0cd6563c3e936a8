use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use unitime_core::models::time::{DayOfWeek, TimeRange};

use crate::test_utils::TestContext;

fn request(ctx: &TestContext, slots: &[(&str, &str)], days: &[i16]) -> Value {
    json!({
        "semester_id": ctx.semester_id,
        "time_slots": slots
            .iter()
            .map(|(start, end)| json!({ "start": start, "end": end }))
            .collect::<Vec<_>>(),
        "days_of_week": days,
    })
}

#[test_log::test(tokio::test)]
async fn test_generate_places_allocated_courses() {
    let ctx = TestContext::new();
    let (math, physics) = (ctx.course("MA101", 80), ctx.course("PH101", 20));
    let lecturer = ctx.lecturer("Ada Lovelace");
    ctx.venue("Hall A", 100);
    ctx.venue("Room 12", 25);
    ctx.store.allocate(math.id, lecturer.id, ctx.semester_id).unwrap();
    ctx.store.allocate(physics.id, lecturer.id, ctx.semester_id).unwrap();
    ctx.store.add_availability(
        lecturer.id,
        DayOfWeek::MONDAY,
        TimeRange::parse("08:00", "12:00").unwrap(),
    );

    let response = ctx
        .server
        .post("/api/timetable/generate")
        .json(&request(&ctx, &[("08:00", "10:00"), ("10:00", "12:00")], &[1]))
        .await;

    response.assert_status_ok();
    let result: Value = response.json();
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["sessions_created"], json!(2));
    assert_eq!(result["errors"], json!([]));

    // Same lecturer, so the second course takes the next slot.
    let times: Vec<Value> = result["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["time"]["start"].clone())
        .collect();
    assert_eq!(times, vec![json!("08:00"), json!("10:00")]);
    assert!(ctx.store.sessions().iter().all(|s| !s.is_published()));
}

#[tokio::test]
async fn test_generate_reports_unplaceable_courses() {
    let ctx = TestContext::new();
    let course = ctx.course("CS500", 300);
    let lecturer = ctx.lecturer("Grace Hopper");
    ctx.venue("Room 12", 25);
    ctx.store.allocate(course.id, lecturer.id, ctx.semester_id).unwrap();

    let response = ctx
        .server
        .post("/api/timetable/generate")
        .json(&request(&ctx, &[("08:00", "10:00")], &[1]))
        .await;

    response.assert_status_ok();
    let result: Value = response.json();
    assert_eq!(result["success"], json!(false));
    assert_eq!(result["sessions_created"], json!(0));
    assert_eq!(
        result["errors"],
        json!(["No venue with capacity for CS500 (requires 300 seats)"])
    );
}

#[tokio::test]
async fn test_generate_without_allocations() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/timetable/generate")
        .json(&request(&ctx, &[("08:00", "10:00")], &[1]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Precondition failed:"));
}

#[tokio::test]
async fn test_generate_requires_slots_and_days() {
    let ctx = TestContext::new();

    let no_slots = ctx
        .server
        .post("/api/timetable/generate")
        .json(&request(&ctx, &[], &[1]))
        .await;
    no_slots.assert_status(StatusCode::BAD_REQUEST);

    let no_days = ctx
        .server
        .post("/api/timetable/generate")
        .json(&request(&ctx, &[("08:00", "10:00")], &[]))
        .await;
    no_days.assert_status(StatusCode::BAD_REQUEST);
}
