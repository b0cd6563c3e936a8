#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::{Value, json};
use unitime_api::{ApiState, app};
use unitime_core::{
    TimetableEngine,
    models::resources::{Course, Lecturer, Venue},
    store::{TimetableStore, memory::MemoryStore},
};
use uuid::Uuid;

/// A test server over a fresh in-memory store and one semester.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
    pub semester_id: Uuid,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let server = server_for(store.clone());
        Self {
            store,
            server,
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

    /// JSON body for a placement of `course` in this context's semester.
    pub fn placement(
        &self,
        course: &Course,
        lecturer: &Lecturer,
        venue: &Venue,
        day: i16,
        start: &str,
        end: &str,
    ) -> Value {
        json!({
            "course_id": course.id,
            "lecturer_id": lecturer.id,
            "venue_id": venue.id,
            "semester_id": self.semester_id,
            "day_of_week": day,
            "start_time": start,
            "end_time": end,
        })
    }

    /// Creates a draft session through the API and returns its id.
    pub async fn create_session(&self, body: &Value) -> Uuid {
        let response = self.server.post("/api/timetable/sessions").json(body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        created["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("created session has an id")
    }

    pub fn semester_url(&self, action: &str) -> String {
        format!("/api/timetable/semesters/{}/{}", self.semester_id, action)
    }
}

pub fn server_for(store: Arc<dyn TimetableStore>) -> TestServer {
    let engine = TimetableEngine::new(store);
    let state = ApiState::new(engine, Duration::from_secs(30));
    TestServer::new(app(state)).expect("test server starts")
}
