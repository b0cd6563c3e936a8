use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};
use unitime_core::{
    models::session::{Placement, TimetableSession},
    store::{REMOVED_COURSE, REMOVED_LECTURER, REMOVED_VENUE, SessionQuery},
};
use uuid::Uuid;

use crate::models::{DbScheduledSession, DbTimetableSession};

const SESSION_COLUMNS: &str = "s.id, s.course_id, s.lecturer_id, s.venue_id, s.semester_id, \
     s.day_of_week, s.start_time, s.end_time, s.status, s.version, s.created_at, s.updated_at";

pub async fn find_sessions(
    pool: &Pool<Postgres>,
    query: &SessionQuery,
) -> Result<Vec<DbScheduledSession>> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(SESSION_COLUMNS);
    builder
        .push(", COALESCE(c.code, ")
        .push_bind(REMOVED_COURSE)
        .push(") AS course_code, COALESCE(l.name, ")
        .push_bind(REMOVED_LECTURER)
        .push(") AS lecturer_name, COALESCE(v.name, ")
        .push_bind(REMOVED_VENUE)
        .push(
            ") AS venue_name \
             FROM timetable_sessions s \
             LEFT JOIN courses c ON c.id = s.course_id \
             LEFT JOIN lecturers l ON l.id = s.lecturer_id \
             LEFT JOIN venues v ON v.id = s.venue_id \
             WHERE s.semester_id = ",
        );
    builder.push_bind(query.semester_id);

    if let Some(day) = query.day_of_week {
        builder.push(" AND s.day_of_week = ").push_bind(day.value());
    }
    if let Some(venue_id) = query.venue_id {
        builder
            .push(" AND v.id IS NOT NULL AND s.venue_id = ")
            .push_bind(venue_id);
    }
    if let Some(lecturer_id) = query.lecturer_id {
        builder
            .push(" AND l.id IS NOT NULL AND s.lecturer_id = ")
            .push_bind(lecturer_id);
    }
    if let Some(exclude_id) = query.exclude_id {
        builder.push(" AND s.id <> ").push_bind(exclude_id);
    }
    if !query.statuses.is_empty() {
        let statuses: Vec<String> = query
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        builder.push(" AND s.status = ANY(").push_bind(statuses).push(")");
    }
    builder.push(" ORDER BY s.day_of_week ASC, s.start_time ASC, s.id ASC");

    let sessions = builder
        .build_query_as::<DbScheduledSession>()
        .fetch_all(pool)
        .await?;

    tracing::debug!("Session query {:?} matched {} rows", query, sessions.len());
    Ok(sessions)
}

pub async fn get_session_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbTimetableSession>> {
    let session = sqlx::query_as::<_, DbTimetableSession>(
        r#"
        SELECT id, course_id, lecturer_id, venue_id, semester_id, day_of_week,
               start_time, end_time, status, version, created_at, updated_at
        FROM timetable_sessions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Inserts every session or none of them.
pub async fn insert_sessions(
    pool: &Pool<Postgres>,
    sessions: &[TimetableSession],
) -> Result<Vec<DbTimetableSession>> {
    let mut tx = pool.begin().await?;
    let mut inserted = Vec::with_capacity(sessions.len());

    for session in sessions {
        let row = sqlx::query_as::<_, DbTimetableSession>(
            r#"
            INSERT INTO timetable_sessions (
                id, course_id, lecturer_id, venue_id, semester_id, day_of_week,
                start_time, end_time, status, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, course_id, lecturer_id, venue_id, semester_id, day_of_week,
                      start_time, end_time, status, version, created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.course_id)
        .bind(session.lecturer_id)
        .bind(session.venue_id)
        .bind(session.semester_id)
        .bind(session.day_of_week.value())
        .bind(session.time.start().to_string())
        .bind(session.time.end().to_string())
        .bind(session.status.as_str())
        .bind(session.version)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(&mut *tx)
        .await?;
        inserted.push(row);
    }

    tx.commit().await?;
    tracing::debug!("Inserted {} timetable sessions", inserted.len());
    Ok(inserted)
}

/// Moves a draft session. Returns `None` when no draft has `id`.
pub async fn update_draft_placement(
    pool: &Pool<Postgres>,
    id: Uuid,
    placement: &Placement,
) -> Result<Option<DbTimetableSession>> {
    let session = sqlx::query_as::<_, DbTimetableSession>(
        r#"
        UPDATE timetable_sessions
        SET course_id = $2, lecturer_id = $3, venue_id = $4, semester_id = $5,
            day_of_week = $6, start_time = $7, end_time = $8, updated_at = $9
        WHERE id = $1 AND status = 'DRAFT'
        RETURNING id, course_id, lecturer_id, venue_id, semester_id, day_of_week,
                  start_time, end_time, status, version, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(placement.course_id)
    .bind(placement.lecturer_id)
    .bind(placement.venue_id)
    .bind(placement.semester_id)
    .bind(placement.day_of_week.value())
    .bind(placement.time.start().to_string())
    .bind(placement.time.end().to_string())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(session)
}
