use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use unitime_core::{
    errors::TimetableError,
    models::{
        requests::{
            CheckConflictsRequest, CheckConflictsResponse, GenerateTimetableRequest,
            GenerationResult, PlacementRequest, PublishRequest, PublishResponse, RollbackRequest,
            RollbackResponse, VersionListResponse,
        },
        session::TimetableSession,
    },
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn check_conflicts(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CheckConflictsRequest>,
) -> Result<Json<CheckConflictsResponse>, AppError> {
    let placement = payload.placement.placement()?;
    let conflicts = state
        .engine
        .check_conflicts(&placement, payload.exclude_session_id)
        .await?;

    Ok(Json(CheckConflictsResponse {
        has_conflicts: !conflicts.is_empty(),
        conflicts,
    }))
}

#[axum::debug_handler]
pub async fn generate_timetable(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<GenerateTimetableRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    if payload.time_slots.is_empty() {
        return Err(TimetableError::Validation("time_slots must not be empty".to_string()).into());
    }
    if payload.days_of_week.is_empty() {
        return Err(TimetableError::Validation("days_of_week must not be empty".to_string()).into());
    }

    let result = tokio::time::timeout(
        state.generation_timeout,
        state.engine.generate_timetable(&payload),
    )
    .await
    .map_err(|_| {
        TimetableError::Timeout(format!(
            "Timetable generation for semester {} exceeded {}s",
            payload.semester_id,
            state.generation_timeout.as_secs()
        ))
    })??;

    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn create_session(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PlacementRequest>,
) -> Result<(StatusCode, Json<TimetableSession>), AppError> {
    let session = state.engine.create_session(payload.placement()?).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[axum::debug_handler]
pub async fn update_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlacementRequest>,
) -> Result<Json<TimetableSession>, AppError> {
    let session = state.engine.update_session(id, payload.placement()?).await?;
    Ok(Json(session))
}

/// The body is optional; an empty POST publishes anonymously. A body that is
/// present must be a valid `PublishRequest`.
#[axum::debug_handler]
pub async fn publish(
    State(state): State<Arc<ApiState>>,
    Path(semester_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<PublishResponse>, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PublishRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            TimetableError::Validation(format!("Invalid publish request body: {}", e))
        })?
    };
    let response = state.engine.publish(semester_id, request).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn rollback(
    State(state): State<Arc<ApiState>>,
    Path(semester_id): Path<Uuid>,
    Json(payload): Json<RollbackRequest>,
) -> Result<Json<RollbackResponse>, AppError> {
    let response = state.engine.rollback(semester_id, payload.version).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_versions(
    State(state): State<Arc<ApiState>>,
    Path(semester_id): Path<Uuid>,
) -> Result<Json<VersionListResponse>, AppError> {
    let versions = state.engine.list_versions(semester_id).await?;
    Ok(Json(VersionListResponse {
        semester_id,
        versions,
    }))
}
