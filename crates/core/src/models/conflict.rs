use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::ScheduledSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    Venue,
    Lecturer,
    Student,
}

/// A double-booking found while validating a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub message: String,
    pub conflicting_session_id: Uuid,
    /// Number of shared students, set for `STUDENT` conflicts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_students: Option<usize>,
}

impl Conflict {
    pub fn venue(occupant: &ScheduledSession) -> Self {
        let session = &occupant.session;
        Self {
            kind: ConflictKind::Venue,
            message: format!(
                "Venue {} is already booked for {} ({}) on {} {}",
                occupant.venue_name,
                occupant.course_code,
                occupant.lecturer_name,
                session.day_of_week,
                session.time
            ),
            conflicting_session_id: session.id,
            overlapping_students: None,
        }
    }

    pub fn lecturer(occupant: &ScheduledSession) -> Self {
        let session = &occupant.session;
        Self {
            kind: ConflictKind::Lecturer,
            message: format!(
                "Lecturer {} is already teaching {} in {} on {} {}",
                occupant.lecturer_name,
                occupant.course_code,
                occupant.venue_name,
                session.day_of_week,
                session.time
            ),
            conflicting_session_id: session.id,
            overlapping_students: None,
        }
    }

    pub fn student(occupant: &ScheduledSession, shared: usize) -> Self {
        let session = &occupant.session;
        Self {
            kind: ConflictKind::Student,
            message: format!(
                "{} student(s) are also registered in {}, scheduled on {} {}",
                shared, occupant.course_code, session.day_of_week, session.time
            ),
            conflicting_session_id: session.id,
            overlapping_students: Some(shared),
        }
    }
}
