use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::TimetableEngine;
use crate::errors::{TimetableError, TimetableResult};
use crate::models::{
    conflict::Conflict,
    requests::{GenerateTimetableRequest, GenerationResult},
    resources::{AllocatedCourse, Venue},
    session::{Placement, ScheduledSession, TimetableSession},
};
use crate::store::{SessionQuery, TimetableStore};

/// Why a single allocation could not be placed. Never aborts the run.
enum Unplaced {
    NoVenue { required: i32 },
    NoAvailability,
    NoSlot,
}

impl<S: TimetableStore + ?Sized> TimetableEngine<S> {
    /// Places every allocation of the semester as a draft session.
    ///
    /// Allocations are processed in storage order, first fit: each course gets
    /// the first venue (largest first) that seats it and the first
    /// availability-window/time-slot pair that passes the conflict check.
    /// Sessions accepted earlier in the run count as occupied for later
    /// courses. All accepted sessions are created in one batch at the end.
    ///
    /// Fails outright only when the semester has no allocations or storage
    /// fails while loading inputs or creating the batch. Courses that cannot
    /// be placed are reported in `errors`, rejected slots in `conflicts`.
    pub async fn generate_timetable(
        &self,
        request: &GenerateTimetableRequest,
    ) -> TimetableResult<GenerationResult> {
        let semester_id = request.semester_id;

        let allocations = self.store.allocations_for_semester(semester_id).await?;
        if allocations.is_empty() {
            return Err(TimetableError::Precondition(format!(
                "No course allocations found for semester {}",
                semester_id
            )));
        }

        let mut venues = self.store.venues_by_capacity().await?;
        venues.sort_by_key(|v| Reverse(v.capacity));

        let existing = self
            .store
            .find_sessions(&SessionQuery::semester(semester_id).live())
            .await?;
        let placed: HashSet<(Uuid, Uuid)> = existing
            .iter()
            .map(|s| (s.session.course_id, s.session.lecturer_id))
            .collect();

        info!(
            %semester_id,
            allocations = allocations.len(),
            venues = venues.len(),
            existing = existing.len(),
            "Generating timetable"
        );

        let mut result = GenerationResult::default();
        let mut pending: Vec<ScheduledSession> = Vec::new();

        for allocation in &allocations {
            let code = &allocation.course.code;
            if placed.contains(&(allocation.course.id, allocation.lecturer.id)) {
                debug!(course = %code, "Course already scheduled, skipping");
                result.skipped.push(code.clone());
                continue;
            }

            match self
                .place_course(allocation, &venues, request, &pending, &mut result.conflicts)
                .await
            {
                Ok(Ok(session)) => {
                    debug!(
                        course = %code,
                        venue = %session.venue_name,
                        day = %session.session.day_of_week,
                        time = %session.session.time,
                        "Placed course"
                    );
                    pending.push(session);
                }
                Ok(Err(unplaced)) => {
                    let message = match unplaced {
                        Unplaced::NoVenue { required } => format!(
                            "No venue with capacity for {} (requires {} seats)",
                            code, required
                        ),
                        Unplaced::NoAvailability => format!(
                            "Lecturer {} has no availability on the requested days for {}",
                            allocation.lecturer.name, code
                        ),
                        Unplaced::NoSlot => format!("Could not find available slot for {}", code),
                    };
                    warn!(course = %code, "{}", message);
                    result.errors.push(message);
                }
                Err(err) => {
                    warn!(course = %code, error = %err, "Storage failure while placing course");
                    result.errors.push(format!("Failed to schedule {}: {}", code, err));
                }
            }
        }

        if !pending.is_empty() {
            let drafts: Vec<TimetableSession> = pending.into_iter().map(|p| p.session).collect();
            result.sessions = self.store.create_sessions(drafts).await?;
        }
        result.sessions_created = result.sessions.len();
        result.success = result.errors.is_empty();

        info!(
            %semester_id,
            created = result.sessions_created,
            skipped = result.skipped.len(),
            conflicts = result.conflicts.len(),
            errors = result.errors.len(),
            "Timetable generation finished"
        );
        Ok(result)
    }

    async fn place_course(
        &self,
        allocation: &AllocatedCourse,
        venues: &[Venue],
        request: &GenerateTimetableRequest,
        pending: &[ScheduledSession],
        conflicts: &mut Vec<Conflict>,
    ) -> TimetableResult<Result<ScheduledSession, Unplaced>> {
        let course = &allocation.course;
        let lecturer = &allocation.lecturer;

        let registered = self
            .store
            .active_registrations(course.id, allocation.semester_id)
            .await?
            .len();
        let expected_size = if registered == 0 {
            course.expected_size
        } else {
            i32::try_from(registered).unwrap_or(i32::MAX)
        };

        let Some(venue) = venues.iter().find(|v| v.capacity >= expected_size) else {
            return Ok(Err(Unplaced::NoVenue {
                required: expected_size,
            }));
        };

        let windows: Vec<_> = self
            .store
            .lecturer_availability(lecturer.id)
            .await?
            .into_iter()
            .filter(|a| request.days_of_week.contains(&a.day_of_week))
            .collect();
        if windows.is_empty() {
            return Ok(Err(Unplaced::NoAvailability));
        }

        for window in &windows {
            for slot in &request.time_slots {
                if !window.window.contains(slot) {
                    continue;
                }

                let placement = Placement {
                    course_id: course.id,
                    lecturer_id: lecturer.id,
                    venue_id: venue.id,
                    semester_id: allocation.semester_id,
                    day_of_week: window.day_of_week,
                    time: *slot,
                };
                let found = self.detect_conflicts(&placement, None, pending).await?;
                if found.is_empty() {
                    return Ok(Ok(ScheduledSession {
                        session: TimetableSession::draft(placement),
                        course_code: course.code.clone(),
                        lecturer_name: lecturer.name.clone(),
                        venue_name: venue.name.clone(),
                    }));
                }
                conflicts.extend(found);
            }
        }

        Ok(Err(Unplaced::NoSlot))
    }
}
