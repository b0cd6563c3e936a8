use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/timetable/conflicts",
            post(handlers::timetable::check_conflicts),
        )
        .route(
            "/api/timetable/generate",
            post(handlers::timetable::generate_timetable),
        )
        .route(
            "/api/timetable/sessions",
            post(handlers::timetable::create_session),
        )
        .route(
            "/api/timetable/sessions/:id",
            put(handlers::timetable::update_session),
        )
        .route(
            "/api/timetable/semesters/:semester_id/publish",
            post(handlers::timetable::publish),
        )
        .route(
            "/api/timetable/semesters/:semester_id/rollback",
            post(handlers::timetable::rollback),
        )
        .route(
            "/api/timetable/semesters/:semester_id/versions",
            get(handlers::timetable::list_versions),
        )
}
