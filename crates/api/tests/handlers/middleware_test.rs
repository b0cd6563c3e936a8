use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use unitime_api::middleware::error_handling::{AppError, map_error};
use unitime_core::{
    errors::TimetableError,
    models::conflict::{Conflict, ConflictKind},
};
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case::not_found(TimetableError::NotFound("Version 3".into()), StatusCode::NOT_FOUND)]
#[case::validation(TimetableError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case::precondition(TimetableError::Precondition("no allocations".into()), StatusCode::BAD_REQUEST)]
#[case::conflicts(TimetableError::Conflicts(vec![]), StatusCode::CONFLICT)]
#[case::version_conflict(
    TimetableError::VersionConflict { semester_id: Uuid::nil(), expected: 1, found: 2 },
    StatusCode::CONFLICT
)]
#[case::timeout(TimetableError::Timeout("generation".into()), StatusCode::GATEWAY_TIMEOUT)]
#[case::database(TimetableError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    TimetableError::Internal(Box::new(std::io::Error::other("boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: TimetableError, #[case] expected: StatusCode) {
    assert_eq!(AppError(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(TimetableError::NotFound("Version 3 not found".to_string()));

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Resource not found: Version 3 not found" })
    );
}

#[tokio::test]
async fn test_conflict_body_lists_conflicts() {
    let conflict = Conflict {
        kind: ConflictKind::Lecturer,
        message: "Lecturer Ada Lovelace is already teaching MA101".to_string(),
        conflicting_session_id: Uuid::new_v4(),
        overlapping_students: None,
    };

    let response = map_error(TimetableError::Conflicts(vec![conflict.clone()]));

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Placement has 1 conflict(s)"));
    assert_eq!(body["conflicts"], json!([conflict]));
}

#[test]
fn test_eyre_report_is_database_error() {
    let error: AppError = eyre::eyre!("pool exhausted").into();
    assert!(matches!(error.0, TimetableError::Database(_)));
}
