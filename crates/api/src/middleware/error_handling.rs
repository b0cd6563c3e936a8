//! # Error Handling Middleware
//!
//! Maps [`TimetableError`] to HTTP status codes and JSON error bodies so
//! every handler reports failures the same way. Conflict rejections also
//! carry the full conflict list.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use unitime_core::errors::TimetableError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use unitime_api::middleware::error_handling::AppError;
/// use unitime_core::errors::TimetableError;
///
/// async fn handler(version: i32) -> Result<Json<i32>, AppError> {
///     if version < 1 {
///         return Err(TimetableError::Validation("version must be positive".into()).into());
///     }
///     Ok(Json(version))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimetableError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimetableError::NotFound(_) => StatusCode::NOT_FOUND,
            TimetableError::Validation(_) => StatusCode::BAD_REQUEST,
            TimetableError::Precondition(_) => StatusCode::BAD_REQUEST,
            TimetableError::Conflicts(_) => StatusCode::CONFLICT,
            TimetableError::VersionConflict { .. } => StatusCode::CONFLICT,
            TimetableError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            TimetableError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimetableError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        }

        let body = match self.0 {
            TimetableError::Conflicts(conflicts) => json!({
                "error": message,
                "conflicts": conflicts,
            }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<TimetableError> for AppError {
    fn from(err: TimetableError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TimetableError::Database(err))
    }
}

/// Maps a TimetableError to an HTTP response
pub fn map_error(err: TimetableError) -> Response {
    AppError(err).into_response()
}
