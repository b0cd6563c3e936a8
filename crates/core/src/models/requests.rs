use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conflict::Conflict;
use super::session::{Placement, TimetableSession, TimetableVersion};
use super::time::{DayOfWeek, TimeOfDay, TimeRange};
use crate::errors::TimetableResult;

/// A proposed placement as callers send it, with loose start/end times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub course_id: Uuid,
    pub lecturer_id: Uuid,
    pub venue_id: Uuid,
    pub semester_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl PlacementRequest {
    pub fn placement(&self) -> TimetableResult<Placement> {
        Ok(Placement {
            course_id: self.course_id,
            lecturer_id: self.lecturer_id,
            venue_id: self.venue_id,
            semester_id: self.semester_id,
            day_of_week: self.day_of_week,
            time: TimeRange::new(self.start_time, self.end_time)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictsRequest {
    #[serde(flatten)]
    pub placement: PlacementRequest,
    pub exclude_session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictsResponse {
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTimetableRequest {
    pub semester_id: Uuid,
    pub time_slots: Vec<TimeRange>,
    pub days_of_week: Vec<DayOfWeek>,
}

/// Outcome of a generation run. Partial success is normal: `success` only
/// reports whether every allocation was either placed or skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    pub sessions_created: usize,
    pub sessions: Vec<TimetableSession>,
    pub conflicts: Vec<Conflict>,
    pub errors: Vec<String>,
    /// Course codes left alone because they already have a live session.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishRequest {
    pub published_by: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub semester_id: Uuid,
    pub version: i32,
    pub sessions_published: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackRequest {
    pub version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackResponse {
    pub semester_id: Uuid,
    pub version: i32,
    pub sessions_restored: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionListResponse {
    pub semester_id: Uuid,
    pub versions: Vec<TimetableVersion>,
}
