//! In-memory [`TimetableStore`] for tests and local development.
//!
//! All state sits behind one mutex and every trait method takes it for its
//! full duration, so writes are atomic and serialized.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    NewVersionRecord, PublishCommit, REMOVED_COURSE, REMOVED_LECTURER, REMOVED_VENUE, SessionQuery,
    TimetableStore,
};
use crate::errors::{TimetableError, TimetableResult};
use crate::models::{
    resources::{
        AllocatedCourse, Course, CourseAllocation, Lecturer, LecturerAvailability,
        StudentCourseRegistration, Venue,
    },
    session::{Placement, ScheduledSession, SessionStatus, TimetableSession, TimetableVersion},
    time::{DayOfWeek, TimeRange},
};

#[derive(Debug, Default)]
struct State {
    courses: HashMap<Uuid, Course>,
    lecturers: HashMap<Uuid, Lecturer>,
    venues: HashMap<Uuid, Venue>,
    allocations: Vec<CourseAllocation>,
    availability: Vec<LecturerAvailability>,
    registrations: Vec<StudentCourseRegistration>,
    sessions: Vec<TimetableSession>,
    versions: Vec<TimetableVersion>,
    members: HashMap<(Uuid, i32), Vec<Uuid>>,
}

impl State {
    fn scheduled(&self, session: &TimetableSession) -> ScheduledSession {
        let course_code = self
            .courses
            .get(&session.course_id)
            .map_or(REMOVED_COURSE, |c| c.code.as_str());
        let lecturer_name = self
            .lecturers
            .get(&session.lecturer_id)
            .map_or(REMOVED_LECTURER, |l| l.name.as_str());
        let venue_name = self
            .venues
            .get(&session.venue_id)
            .map_or(REMOVED_VENUE, |v| v.name.as_str());
        ScheduledSession {
            session: session.clone(),
            course_code: course_code.to_string(),
            lecturer_name: lecturer_name.to_string(),
            venue_name: venue_name.to_string(),
        }
    }

    /// A venue or lecturer filter on a removed row matches nothing.
    fn filter_targets_exist(&self, query: &SessionQuery) -> bool {
        query.venue_id.is_none_or(|id| self.venues.contains_key(&id))
            && query.lecturer_id.is_none_or(|id| self.lecturers.contains_key(&id))
    }

    fn max_version(&self, semester_id: Uuid) -> i32 {
        self.versions
            .iter()
            .filter(|v| v.semester_id == semester_id)
            .map(|v| v.version)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_course(&self, code: &str, name: &str, expected_size: i32) -> Course {
        let course = Course {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            expected_size,
        };
        self.state().courses.insert(course.id, course.clone());
        course
    }

    pub fn add_lecturer(&self, name: &str) -> Lecturer {
        let lecturer = Lecturer {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.state().lecturers.insert(lecturer.id, lecturer.clone());
        lecturer
    }

    pub fn add_venue(&self, name: &str, capacity: i32) -> Venue {
        let venue = Venue {
            id: Uuid::new_v4(),
            name: name.to_string(),
            capacity,
        };
        self.state().venues.insert(venue.id, venue.clone());
        venue
    }

    pub fn remove_venue(&self, venue_id: Uuid) {
        self.state().venues.remove(&venue_id);
    }

    /// Fails with `Validation` if the course is already allocated for the semester.
    pub fn allocate(
        &self,
        course_id: Uuid,
        lecturer_id: Uuid,
        semester_id: Uuid,
    ) -> TimetableResult<CourseAllocation> {
        let mut state = self.state();
        if state
            .allocations
            .iter()
            .any(|a| a.course_id == course_id && a.semester_id == semester_id)
        {
            return Err(TimetableError::Validation(format!(
                "Course {} is already allocated for semester {}",
                course_id, semester_id
            )));
        }

        let allocation = CourseAllocation {
            id: Uuid::new_v4(),
            course_id,
            lecturer_id,
            semester_id,
            created_at: Utc::now(),
        };
        state.allocations.push(allocation.clone());
        Ok(allocation)
    }

    pub fn add_availability(
        &self,
        lecturer_id: Uuid,
        day_of_week: DayOfWeek,
        window: TimeRange,
    ) -> LecturerAvailability {
        let availability = LecturerAvailability {
            id: Uuid::new_v4(),
            lecturer_id,
            day_of_week,
            window,
        };
        self.state().availability.push(availability.clone());
        availability
    }

    pub fn register(&self, student_id: Uuid, course_id: Uuid, semester_id: Uuid) {
        self.state().registrations.push(StudentCourseRegistration {
            student_id,
            course_id,
            semester_id,
            dropped_at: None,
        });
    }

    pub fn drop_registration(&self, student_id: Uuid, course_id: Uuid, semester_id: Uuid) {
        let now = Utc::now();
        for registration in self.state().registrations.iter_mut().filter(|r| {
            r.student_id == student_id && r.course_id == course_id && r.semester_id == semester_id
        }) {
            registration.dropped_at.get_or_insert(now);
        }
    }

    /// Snapshot of every stored session in insertion order.
    pub fn sessions(&self) -> Vec<TimetableSession> {
        self.state().sessions.clone()
    }
}

#[async_trait]
impl TimetableStore for MemoryStore {
    async fn find_sessions(&self, query: &SessionQuery) -> TimetableResult<Vec<ScheduledSession>> {
        let state = self.state();
        if !state.filter_targets_exist(query) {
            return Ok(Vec::new());
        }
        Ok(state
            .sessions
            .iter()
            .filter(|s| query.matches(s))
            .map(|s| state.scheduled(s))
            .collect())
    }

    async fn get_session(&self, id: Uuid) -> TimetableResult<Option<TimetableSession>> {
        Ok(self.state().sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn active_registrations(
        &self,
        course_id: Uuid,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<StudentCourseRegistration>> {
        let state = self.state();
        if !state.courses.contains_key(&course_id) {
            return Ok(Vec::new());
        }
        Ok(state
            .registrations
            .iter()
            .filter(|r| r.course_id == course_id && r.semester_id == semester_id && r.is_active())
            .cloned()
            .collect())
    }

    async fn lecturer_availability(
        &self,
        lecturer_id: Uuid,
    ) -> TimetableResult<Vec<LecturerAvailability>> {
        Ok(self
            .state()
            .availability
            .iter()
            .filter(|a| a.lecturer_id == lecturer_id)
            .cloned()
            .collect())
    }

    async fn venues_by_capacity(&self) -> TimetableResult<Vec<Venue>> {
        let mut venues: Vec<Venue> = self.state().venues.values().cloned().collect();
        venues.sort_by(|a, b| b.capacity.cmp(&a.capacity).then_with(|| a.name.cmp(&b.name)));
        Ok(venues)
    }

    async fn allocations_for_semester(
        &self,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<AllocatedCourse>> {
        let state = self.state();
        Ok(state
            .allocations
            .iter()
            .filter(|a| a.semester_id == semester_id)
            .filter_map(|a| {
                Some(AllocatedCourse {
                    allocation_id: a.id,
                    semester_id: a.semester_id,
                    course: state.courses.get(&a.course_id)?.clone(),
                    lecturer: state.lecturers.get(&a.lecturer_id)?.clone(),
                })
            })
            .collect())
    }

    async fn max_version(&self, semester_id: Uuid) -> TimetableResult<i32> {
        Ok(self.state().max_version(semester_id))
    }

    async fn find_version(
        &self,
        semester_id: Uuid,
        version: i32,
    ) -> TimetableResult<Option<TimetableVersion>> {
        Ok(self
            .state()
            .versions
            .iter()
            .find(|v| v.semester_id == semester_id && v.version == version)
            .cloned())
    }

    async fn list_versions(&self, semester_id: Uuid) -> TimetableResult<Vec<TimetableVersion>> {
        let mut versions: Vec<TimetableVersion> = self
            .state()
            .versions
            .iter()
            .filter(|v| v.semester_id == semester_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn create_sessions(
        &self,
        sessions: Vec<TimetableSession>,
    ) -> TimetableResult<Vec<TimetableSession>> {
        let mut state = self.state();
        if let Some(dup) = sessions
            .iter()
            .find(|new| state.sessions.iter().any(|s| s.id == new.id))
        {
            return Err(TimetableError::Validation(format!(
                "Session {} already exists",
                dup.id
            )));
        }
        state.sessions.extend(sessions.iter().cloned());
        Ok(sessions)
    }

    async fn update_session_placement(
        &self,
        id: Uuid,
        placement: &Placement,
    ) -> TimetableResult<TimetableSession> {
        let mut state = self.state();
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.status == SessionStatus::Draft)
            .ok_or_else(|| TimetableError::NotFound(format!("Draft session {} not found", id)))?;

        session.course_id = placement.course_id;
        session.lecturer_id = placement.lecturer_id;
        session.venue_id = placement.venue_id;
        session.semester_id = placement.semester_id;
        session.day_of_week = placement.day_of_week;
        session.time = placement.time;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn publish_drafts(
        &self,
        expected_current: i32,
        record: NewVersionRecord,
    ) -> TimetableResult<PublishCommit> {
        let mut state = self.state();
        let current = state.max_version(record.semester_id);
        if current != expected_current {
            return Ok(PublishCommit::Stale { current });
        }

        let mut sessions_published = 0;
        for session in state
            .sessions
            .iter_mut()
            .filter(|s| s.semester_id == record.semester_id && s.status == SessionStatus::Draft)
        {
            session.status = SessionStatus::Published;
            session.version = record.version;
            session.updated_at = record.published_at;
            sessions_published += 1;
        }

        let live: Vec<Uuid> = state
            .sessions
            .iter()
            .filter(|s| s.semester_id == record.semester_id && s.is_published())
            .map(|s| s.id)
            .collect();
        state.members.insert((record.semester_id, record.version), live);

        let version = TimetableVersion {
            id: Uuid::new_v4(),
            semester_id: record.semester_id,
            version: record.version,
            published_at: record.published_at,
            published_by: record.published_by,
            notes: record.notes,
        };
        state.versions.push(version.clone());

        Ok(PublishCommit::Published {
            version,
            sessions_published,
        })
    }

    async fn rollback_to(&self, semester_id: Uuid, version: i32) -> TimetableResult<u64> {
        let mut state = self.state();
        let members = state
            .members
            .get(&(semester_id, version))
            .cloned()
            .ok_or_else(|| {
                TimetableError::NotFound(format!(
                    "Version {} not found for semester {}",
                    version, semester_id
                ))
            })?;

        let now = Utc::now();
        let mut restored = 0;
        for session in state.sessions.iter_mut().filter(|s| s.semester_id == semester_id) {
            let was_published = session.is_published();
            session.status = if members.contains(&session.id) {
                restored += 1;
                SessionStatus::Published
            } else {
                SessionStatus::Draft
            };
            if was_published != session.is_published() {
                session.updated_at = now;
            }
        }
        Ok(restored)
    }
}
