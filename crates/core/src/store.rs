//! # Storage boundary
//!
//! The engine owns no state of its own. Everything it reads or writes goes
//! through [`TimetableStore`], implemented by the Postgres layer in
//! `unitime-db` and by [`memory::MemoryStore`] for tests and local runs.
//!
//! Read methods may run concurrently. Write methods must each be atomic:
//! `create_sessions`, `publish_drafts` and `rollback_to` either apply in full
//! or not at all, and `publish_drafts`/`rollback_to` on one semester must be
//! serialized against each other.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::TimetableResult;
use crate::models::{
    resources::{AllocatedCourse, LecturerAvailability, StudentCourseRegistration, Venue},
    session::{Placement, ScheduledSession, SessionStatus, TimetableSession, TimetableVersion},
    time::DayOfWeek,
};

/// Placeholder names for sessions whose referenced row has been removed.
pub const REMOVED_COURSE: &str = "(removed course)";
pub const REMOVED_LECTURER: &str = "(removed lecturer)";
pub const REMOVED_VENUE: &str = "(removed venue)";

/// Filter for session lookups. `None` fields do not constrain the result and
/// an empty `statuses` list matches every status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub semester_id: Uuid,
    pub day_of_week: Option<DayOfWeek>,
    pub venue_id: Option<Uuid>,
    pub lecturer_id: Option<Uuid>,
    pub exclude_id: Option<Uuid>,
    pub statuses: Vec<SessionStatus>,
}

impl SessionQuery {
    pub fn semester(semester_id: Uuid) -> Self {
        Self {
            semester_id,
            day_of_week: None,
            venue_id: None,
            lecturer_id: None,
            exclude_id: None,
            statuses: Vec::new(),
        }
    }

    pub fn on_day(mut self, day: DayOfWeek) -> Self {
        self.day_of_week = Some(day);
        self
    }

    pub fn in_venue(mut self, venue_id: Uuid) -> Self {
        self.venue_id = Some(venue_id);
        self
    }

    pub fn for_lecturer(mut self, lecturer_id: Uuid) -> Self {
        self.lecturer_id = Some(lecturer_id);
        self
    }

    pub fn excluding(mut self, session_id: Option<Uuid>) -> Self {
        self.exclude_id = session_id;
        self
    }

    pub fn with_statuses(mut self, statuses: &[SessionStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }

    /// Restricts to sessions that hold resources (draft or published).
    pub fn live(self) -> Self {
        self.with_statuses(&SessionStatus::LIVE)
    }

    pub fn matches(&self, session: &TimetableSession) -> bool {
        session.semester_id == self.semester_id
            && self.day_of_week.is_none_or(|day| session.day_of_week == day)
            && self.venue_id.is_none_or(|id| session.venue_id == id)
            && self.lecturer_id.is_none_or(|id| session.lecturer_id == id)
            && self.exclude_id != Some(session.id)
            && (self.statuses.is_empty() || self.statuses.contains(&session.status))
    }
}

/// Ledger row to append when a publish commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersionRecord {
    pub semester_id: Uuid,
    pub version: i32,
    pub published_at: DateTime<Utc>,
    pub published_by: Option<Uuid>,
    pub notes: Option<String>,
}

/// Result of an attempted publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCommit {
    Published {
        version: TimetableVersion,
        sessions_published: u64,
    },
    /// Another publish advanced the semester first; nothing was written.
    Stale { current: i32 },
}

#[async_trait]
pub trait TimetableStore: Send + Sync {
    /// Sessions matching `query`, with course code, lecturer and venue names.
    ///
    /// A session whose course, lecturer or venue row no longer exists is still
    /// returned, named with [`REMOVED_COURSE`], [`REMOVED_LECTURER`] or
    /// [`REMOVED_VENUE`]. Only a `venue_id` or `lecturer_id` filter naming a
    /// venue or lecturer that no longer exists matches nothing.
    async fn find_sessions(&self, query: &SessionQuery) -> TimetableResult<Vec<ScheduledSession>>;

    async fn get_session(&self, id: Uuid) -> TimetableResult<Option<TimetableSession>>;

    /// Registrations for the course and semester that have not been dropped.
    /// Empty when the course no longer exists.
    async fn active_registrations(
        &self,
        course_id: Uuid,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<StudentCourseRegistration>>;

    async fn lecturer_availability(
        &self,
        lecturer_id: Uuid,
    ) -> TimetableResult<Vec<LecturerAvailability>>;

    /// All venues, largest capacity first.
    async fn venues_by_capacity(&self) -> TimetableResult<Vec<Venue>>;

    /// Allocations for the semester in a stable order.
    async fn allocations_for_semester(
        &self,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<AllocatedCourse>>;

    /// Highest published version for the semester, `0` if none.
    async fn max_version(&self, semester_id: Uuid) -> TimetableResult<i32>;

    async fn find_version(
        &self,
        semester_id: Uuid,
        version: i32,
    ) -> TimetableResult<Option<TimetableVersion>>;

    async fn list_versions(&self, semester_id: Uuid) -> TimetableResult<Vec<TimetableVersion>>;

    /// Inserts all sessions in one transaction.
    async fn create_sessions(
        &self,
        sessions: Vec<TimetableSession>,
    ) -> TimetableResult<Vec<TimetableSession>>;

    /// Moves a draft session. Fails with `NotFound` when no draft has `id`.
    async fn update_session_placement(
        &self,
        id: Uuid,
        placement: &Placement,
    ) -> TimetableResult<TimetableSession>;

    /// Publishes every draft of `record.semester_id` as `record.version`,
    /// appends the ledger row and snapshots the live session set, provided the
    /// semester's current version still equals `expected_current`.
    async fn publish_drafts(
        &self,
        expected_current: i32,
        record: NewVersionRecord,
    ) -> TimetableResult<PublishCommit>;

    /// Demotes every published session of the semester, then re-publishes the
    /// sessions that were live at `version`. Returns the number restored.
    async fn rollback_to(&self, semester_id: Uuid, version: i32) -> TimetableResult<u64>;
}
