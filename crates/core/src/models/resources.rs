use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{DayOfWeek, TimeRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    /// Planned enrollment, used until real registrations exist.
    pub expected_size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
}

/// Binds a course to the lecturer teaching it in one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAllocation {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lecturer_id: Uuid,
    pub semester_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An allocation joined with the course and lecturer it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedCourse {
    pub allocation_id: Uuid,
    pub semester_id: Uuid,
    pub course: Course,
    pub lecturer: Lecturer,
}

/// One weekly window in which a lecturer can teach. Windows may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerAvailability {
    pub id: Uuid,
    pub lecturer_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub window: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCourseRegistration {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub semester_id: Uuid,
    pub dropped_at: Option<DateTime<Utc>>,
}

impl StudentCourseRegistration {
    pub fn is_active(&self) -> bool {
        self.dropped_at.is_none()
    }
}
