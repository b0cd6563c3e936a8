use thiserror::Error;
use uuid::Uuid;

use crate::models::conflict::Conflict;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The candidate placement collides with existing sessions.
    #[error("Placement has {} conflict(s)", .0.len())]
    Conflicts(Vec<Conflict>),

    #[error("Version conflict for semester {semester_id}: expected version {expected}, found {found}")]
    VersionConflict {
        semester_id: Uuid,
        expected: i32,
        found: i32,
    },

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type TimetableResult<T> = Result<T, TimetableError>;
