//! Read-only lookups over the reference data the engine schedules against.

use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbAllocatedCourse, DbLecturerAvailability, DbRegistration, DbVenue};

pub async fn get_active_registrations(
    pool: &Pool<Postgres>,
    course_id: Uuid,
    semester_id: Uuid,
) -> Result<Vec<DbRegistration>> {
    let registrations = sqlx::query_as::<_, DbRegistration>(
        r#"
        SELECT student_id, course_id, semester_id, dropped_at
        FROM student_course_registrations
        WHERE course_id = $1 AND semester_id = $2 AND dropped_at IS NULL
        "#,
    )
    .bind(course_id)
    .bind(semester_id)
    .fetch_all(pool)
    .await?;

    Ok(registrations)
}

pub async fn get_lecturer_availability(
    pool: &Pool<Postgres>,
    lecturer_id: Uuid,
) -> Result<Vec<DbLecturerAvailability>> {
    let windows = sqlx::query_as::<_, DbLecturerAvailability>(
        r#"
        SELECT id, lecturer_id, day_of_week, start_time, end_time
        FROM lecturer_availability
        WHERE lecturer_id = $1
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(lecturer_id)
    .fetch_all(pool)
    .await?;

    Ok(windows)
}

pub async fn get_venues_by_capacity(pool: &Pool<Postgres>) -> Result<Vec<DbVenue>> {
    let venues = sqlx::query_as::<_, DbVenue>(
        r#"
        SELECT id, name, capacity
        FROM venues
        ORDER BY capacity DESC, name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(venues)
}

pub async fn get_allocations_for_semester(
    pool: &Pool<Postgres>,
    semester_id: Uuid,
) -> Result<Vec<DbAllocatedCourse>> {
    let allocations = sqlx::query_as::<_, DbAllocatedCourse>(
        r#"
        SELECT
            a.id AS allocation_id,
            a.semester_id,
            c.id AS course_id,
            c.code AS course_code,
            c.name AS course_name,
            c.expected_size,
            l.id AS lecturer_id,
            l.name AS lecturer_name
        FROM course_allocations a
        JOIN courses c ON c.id = a.course_id
        JOIN lecturers l ON l.id = a.lecturer_id
        WHERE a.semester_id = $1
        ORDER BY a.created_at ASC, c.code ASC
        "#,
    )
    .bind(semester_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Loaded {} allocations for semester {}",
        allocations.len(),
        semester_id
    );
    Ok(allocations)
}
