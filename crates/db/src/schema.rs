use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const TABLES: &[(&str, &str)] = &[
    (
        "courses",
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            code VARCHAR(32) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            expected_size INTEGER NOT NULL DEFAULT 0 CHECK (expected_size >= 0)
        );
        "#,
    ),
    (
        "lecturers",
        r#"
        CREATE TABLE IF NOT EXISTS lecturers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL
        );
        "#,
    ),
    (
        "venues",
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            capacity INTEGER NOT NULL CHECK (capacity >= 0)
        );
        "#,
    ),
    (
        "course_allocations",
        r#"
        CREATE TABLE IF NOT EXISTS course_allocations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            course_id UUID NOT NULL REFERENCES courses(id),
            lecturer_id UUID NOT NULL REFERENCES lecturers(id),
            semester_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_allocation_per_course UNIQUE (course_id, semester_id)
        );
        "#,
    ),
    (
        "lecturer_availability",
        r#"
        CREATE TABLE IF NOT EXISTS lecturer_availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            lecturer_id UUID NOT NULL REFERENCES lecturers(id),
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            CONSTRAINT valid_availability_window CHECK (end_time > start_time)
        );
        "#,
    ),
    (
        "student_course_registrations",
        r#"
        CREATE TABLE IF NOT EXISTS student_course_registrations (
            student_id UUID NOT NULL,
            course_id UUID NOT NULL REFERENCES courses(id),
            semester_id UUID NOT NULL,
            dropped_at TIMESTAMP WITH TIME ZONE NULL,
            PRIMARY KEY (student_id, course_id, semester_id)
        );
        "#,
    ),
    (
        "timetable_sessions",
        r#"
        CREATE TABLE IF NOT EXISTS timetable_sessions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            course_id UUID NOT NULL REFERENCES courses(id),
            lecturer_id UUID NOT NULL REFERENCES lecturers(id),
            venue_id UUID NOT NULL REFERENCES venues(id),
            semester_id UUID NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'DRAFT' CHECK (status IN ('DRAFT', 'PUBLISHED')),
            version INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_session_time CHECK (end_time > start_time)
        );
        "#,
    ),
    (
        "timetable_versions",
        r#"
        CREATE TABLE IF NOT EXISTS timetable_versions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            semester_id UUID NOT NULL,
            version INTEGER NOT NULL CHECK (version >= 1),
            published_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            published_by UUID NULL,
            notes TEXT NULL,
            CONSTRAINT one_row_per_version UNIQUE (semester_id, version)
        );
        "#,
    ),
    (
        "timetable_version_sessions",
        r#"
        CREATE TABLE IF NOT EXISTS timetable_version_sessions (
            version_id UUID NOT NULL REFERENCES timetable_versions(id) ON DELETE CASCADE,
            session_id UUID NOT NULL REFERENCES timetable_sessions(id) ON DELETE CASCADE,
            PRIMARY KEY (version_id, session_id)
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sessions_semester_day ON timetable_sessions(semester_id, day_of_week)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_venue_day ON timetable_sessions(venue_id, day_of_week)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_lecturer_day ON timetable_sessions(lecturer_id, day_of_week)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_course ON timetable_sessions(course_id, semester_id)",
    "CREATE INDEX IF NOT EXISTS idx_allocations_semester ON course_allocations(semester_id)",
    "CREATE INDEX IF NOT EXISTS idx_availability_lecturer ON lecturer_availability(lecturer_id)",
    "CREATE INDEX IF NOT EXISTS idx_registrations_course ON student_course_registrations(course_id, semester_id)",
    "CREATE INDEX IF NOT EXISTS idx_version_sessions_session ON timetable_version_sessions(session_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Zero-padded "HH:MM" text sorts the same as the time it encodes, which
    // the CHECK constraints above rely on.
    for (table, statement) in TABLES {
        tracing::debug!("Ensuring table {}", table);
        sqlx::query(statement).execute(pool).await?;
    }

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
