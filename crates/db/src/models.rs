use chrono::{DateTime, Utc};
use eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use unitime_core::models::{
    resources::{AllocatedCourse, Course, Lecturer, LecturerAvailability, StudentCourseRegistration, Venue},
    session::{ScheduledSession, TimetableSession, TimetableVersion},
    time::{DayOfWeek, TimeRange},
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVenue {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
}

impl From<DbVenue> for Venue {
    fn from(row: DbVenue) -> Self {
        Venue {
            id: row.id,
            name: row.name,
            capacity: row.capacity,
        }
    }
}

/// `course_allocations` joined with `courses` and `lecturers`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAllocatedCourse {
    pub allocation_id: Uuid,
    pub semester_id: Uuid,
    pub course_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub expected_size: i32,
    pub lecturer_id: Uuid,
    pub lecturer_name: String,
}

impl From<DbAllocatedCourse> for AllocatedCourse {
    fn from(row: DbAllocatedCourse) -> Self {
        AllocatedCourse {
            allocation_id: row.allocation_id,
            semester_id: row.semester_id,
            course: Course {
                id: row.course_id,
                code: row.course_code,
                name: row.course_name,
                expected_size: row.expected_size,
            },
            lecturer: Lecturer {
                id: row.lecturer_id,
                name: row.lecturer_name,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLecturerAvailability {
    pub id: Uuid,
    pub lecturer_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
}

impl TryFrom<DbLecturerAvailability> for LecturerAvailability {
    type Error = Report;

    fn try_from(row: DbLecturerAvailability) -> Result<Self> {
        Ok(LecturerAvailability {
            id: row.id,
            lecturer_id: row.lecturer_id,
            day_of_week: DayOfWeek::new(row.day_of_week)?,
            window: TimeRange::parse(&row.start_time, &row.end_time)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRegistration {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub dropped_at: Option<DateTime<Utc>>,
}

impl From<DbRegistration> for StudentCourseRegistration {
    fn from(row: DbRegistration) -> Self {
        StudentCourseRegistration {
            student_id: row.student_id,
            course_id: row.course_id,
            semester_id: row.semester_id,
            dropped_at: row.dropped_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetableSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lecturer_id: Uuid,
    pub venue_id: Uuid,
    pub semester_id: Uuid,
    pub day_of_week: i16,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbTimetableSession> for TimetableSession {
    type Error = Report;

    fn try_from(row: DbTimetableSession) -> Result<Self> {
        Ok(TimetableSession {
            id: row.id,
            course_id: row.course_id,
            lecturer_id: row.lecturer_id,
            venue_id: row.venue_id,
            semester_id: row.semester_id,
            day_of_week: DayOfWeek::new(row.day_of_week)?,
            time: TimeRange::parse(&row.start_time, &row.end_time)?,
            status: row.status.parse()?,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A session row with the names of its course, lecturer and venue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduledSession {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub session: DbTimetableSession,
    pub course_code: String,
    pub lecturer_name: String,
    pub venue_name: String,
}

impl TryFrom<DbScheduledSession> for ScheduledSession {
    type Error = Report;

    fn try_from(row: DbScheduledSession) -> Result<Self> {
        Ok(ScheduledSession {
            session: row.session.try_into()?,
            course_code: row.course_code,
            lecturer_name: row.lecturer_name,
            venue_name: row.venue_name,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimetableVersion {
    pub id: Uuid,
    pub semester_id: Uuid,
    pub version: i32,
    pub published_at: DateTime<Utc>,
    pub published_by: Option<Uuid>,
    pub notes: Option<String>,
}

impl From<DbTimetableVersion> for TimetableVersion {
    fn from(row: DbTimetableVersion) -> Self {
        TimetableVersion {
            id: row.id,
            semester_id: row.semester_id,
            version: row.version,
            published_at: row.published_at,
            published_by: row.published_by,
            notes: row.notes,
        }
    }
}
