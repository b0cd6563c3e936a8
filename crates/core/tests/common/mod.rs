#![allow(dead_code)]

use std::sync::Arc;

use unitime_core::{
    TimetableEngine,
    models::{
        resources::{Course, Lecturer, Venue},
        session::{Placement, TimetableSession},
        time::{DayOfWeek, TimeRange},
    },
    store::memory::MemoryStore,
};
use uuid::Uuid;

/// One semester seeded into a fresh in-memory store.
pub struct Campus {
    pub store: Arc<MemoryStore>,
    pub engine: TimetableEngine<MemoryStore>,
    pub semester_id: Uuid,
}

impl Campus {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let engine = TimetableEngine::new(Arc::clone(&store));
        Self {
            store,
            engine,
            semester_id: Uuid::new_v4(),
        }
    }

    pub fn course(&self, code: &str, expected_size: i32) -> Course {
        self.store.add_course(code, &format!("{} lectures", code), expected_size)
    }

    pub fn lecturer(&self, name: &str) -> Lecturer {
        self.store.add_lecturer(name)
    }

    pub fn venue(&self, name: &str, capacity: i32) -> Venue {
        self.store.add_venue(name, capacity)
    }

    pub fn placement(
        &self,
        course: &Course,
        lecturer: &Lecturer,
        venue: &Venue,
        day: DayOfWeek,
        start: &str,
        end: &str,
    ) -> Placement {
        Placement {
            course_id: course.id,
            lecturer_id: lecturer.id,
            venue_id: venue.id,
            semester_id: self.semester_id,
            day_of_week: day,
            time: range(start, end),
        }
    }

    /// Stores a draft session directly, bypassing conflict checks.
    pub async fn seed_session(&self, placement: Placement) -> TimetableSession {
        use unitime_core::store::TimetableStore;

        self.store
            .create_sessions(vec![TimetableSession::draft(placement)])
            .await
            .unwrap()
            .remove(0)
    }

    pub fn enroll(&self, course: &Course, students: &[Uuid]) {
        for student in students {
            self.store.register(*student, course.id, self.semester_id);
        }
    }

    pub fn session(&self, id: Uuid) -> TimetableSession {
        self.store
            .sessions()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }
}

pub fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::parse(start, end).unwrap()
}
