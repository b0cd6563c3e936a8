use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use super::TimetableEngine;
use crate::errors::TimetableResult;
use crate::models::{
    conflict::Conflict,
    session::{Placement, ScheduledSession},
};
use crate::store::{SessionQuery, TimetableStore};

impl<S: TimetableStore + ?Sized> TimetableEngine<S> {
    /// Reports every double-booking `placement` would cause.
    ///
    /// Runs the venue, lecturer and student passes independently and returns
    /// all of their findings. An empty list means the placement is legal.
    /// Read-only: safe for dry runs. When re-validating an existing session,
    /// pass its id as `exclude_session_id` or it will collide with itself.
    pub async fn check_conflicts(
        &self,
        placement: &Placement,
        exclude_session_id: Option<Uuid>,
    ) -> TimetableResult<Vec<Conflict>> {
        self.detect_conflicts(placement, exclude_session_id, &[]).await
    }

    /// Same as [`check_conflicts`](Self::check_conflicts), additionally
    /// treating `pending` (accepted but not yet stored) sessions as occupied.
    pub(crate) async fn detect_conflicts(
        &self,
        placement: &Placement,
        exclude_session_id: Option<Uuid>,
        pending: &[ScheduledSession],
    ) -> TimetableResult<Vec<Conflict>> {
        let same_day = SessionQuery::semester(placement.semester_id)
            .on_day(placement.day_of_week)
            .excluding(exclude_session_id)
            .live();

        let mut conflicts = Vec::new();

        let venue_query = same_day.clone().in_venue(placement.venue_id);
        for occupant in self.overlapping(&venue_query, placement, pending).await? {
            conflicts.push(Conflict::venue(&occupant));
        }

        let lecturer_query = same_day.clone().for_lecturer(placement.lecturer_id);
        for occupant in self.overlapping(&lecturer_query, placement, pending).await? {
            conflicts.push(Conflict::lecturer(&occupant));
        }

        conflicts.extend(self.student_conflicts(&same_day, placement, pending).await?);

        debug!(
            course_id = %placement.course_id,
            day = %placement.day_of_week,
            time = %placement.time,
            conflicts = conflicts.len(),
            "Checked placement"
        );
        Ok(conflicts)
    }

    async fn student_conflicts(
        &self,
        same_day: &SessionQuery,
        placement: &Placement,
        pending: &[ScheduledSession],
    ) -> TimetableResult<Vec<Conflict>> {
        let cohort = self
            .cohort(placement.course_id, placement.semester_id)
            .await?;
        // A course nobody has registered for cannot clash for students yet.
        if cohort.is_empty() {
            return Ok(Vec::new());
        }

        let mut cohorts: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        cohorts.insert(placement.course_id, cohort.clone());

        let mut conflicts = Vec::new();
        for occupant in self.overlapping(same_day, placement, pending).await? {
            let course_id = occupant.session.course_id;
            if !cohorts.contains_key(&course_id) {
                let students = self.cohort(course_id, placement.semester_id).await?;
                cohorts.insert(course_id, students);
            }

            let shared = cohorts
                .get(&course_id)
                .map_or(0, |students| students.intersection(&cohort).count());
            if shared > 0 {
                conflicts.push(Conflict::student(&occupant, shared));
            }
        }
        Ok(conflicts)
    }

    /// Distinct students actively registered in the course.
    async fn cohort(&self, course_id: Uuid, semester_id: Uuid) -> TimetableResult<HashSet<Uuid>> {
        Ok(self
            .store
            .active_registrations(course_id, semester_id)
            .await?
            .into_iter()
            .filter(|r| r.is_active())
            .map(|r| r.student_id)
            .collect())
    }

    /// Stored and pending sessions matching `query` whose time overlaps the placement.
    async fn overlapping(
        &self,
        query: &SessionQuery,
        placement: &Placement,
        pending: &[ScheduledSession],
    ) -> TimetableResult<Vec<ScheduledSession>> {
        let stored = self.store.find_sessions(query).await?;
        Ok(stored
            .into_iter()
            .chain(pending.iter().filter(|p| query.matches(&p.session)).cloned())
            .filter(|s| s.session.time.overlaps(&placement.time))
            .collect())
    }
}
