use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{DayOfWeek, TimeRange};
use crate::errors::TimetableError;

/// Version tag carried by sessions that have not been published yet.
pub const DRAFT_VERSION: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Draft,
    Published,
}

impl SessionStatus {
    /// Statuses that occupy a venue, lecturer or cohort.
    pub const LIVE: [SessionStatus; 2] = [SessionStatus::Draft, SessionStatus::Published];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Draft => "DRAFT",
            SessionStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(SessionStatus::Draft),
            "PUBLISHED" => Ok(SessionStatus::Published),
            other => Err(TimetableError::Validation(format!(
                "Unknown session status '{}'",
                other
            ))),
        }
    }
}

/// Where and when a course meets, before it becomes a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub course_id: Uuid,
    pub lecturer_id: Uuid,
    pub venue_id: Uuid,
    pub semester_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub time: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lecturer_id: Uuid,
    pub venue_id: Uuid,
    pub semester_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub time: TimeRange,
    pub status: SessionStatus,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimetableSession {
    /// A fresh unpublished session for `placement`.
    pub fn draft(placement: Placement) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            course_id: placement.course_id,
            lecturer_id: placement.lecturer_id,
            venue_id: placement.venue_id,
            semester_id: placement.semester_id,
            day_of_week: placement.day_of_week,
            time: placement.time,
            status: SessionStatus::Draft,
            version: DRAFT_VERSION,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn placement(&self) -> Placement {
        Placement {
            course_id: self.course_id,
            lecturer_id: self.lecturer_id,
            venue_id: self.venue_id,
            semester_id: self.semester_id,
            day_of_week: self.day_of_week,
            time: self.time,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == SessionStatus::Published
    }
}

/// A session together with the display names conflict messages need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub session: TimetableSession,
    pub course_code: String,
    pub lecturer_name: String,
    pub venue_name: String,
}

/// Ledger row: version `version` of a semester went live at `published_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableVersion {
    pub id: Uuid,
    pub semester_id: Uuid,
    pub version: i32,
    pub published_at: DateTime<Utc>,
    pub published_by: Option<Uuid>,
    pub notes: Option<String>,
}
