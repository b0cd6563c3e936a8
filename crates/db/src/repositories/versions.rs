//! Version ledger and the publish/rollback transitions.
//!
//! Both transitions take a transaction-scoped advisory lock keyed on the
//! semester, so publishes and rollbacks of one semester run one at a time
//! while other semesters proceed independently.

use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use unitime_core::store::{NewVersionRecord, PublishCommit};
use uuid::Uuid;

use crate::models::DbTimetableVersion;

async fn lock_semester(tx: &mut Transaction<'_, Postgres>, semester_id: Uuid) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(semester_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn current_version<'e, E>(executor: E, semester_id: Uuid) -> Result<i32>
where
    E: sqlx::PgExecutor<'e>,
{
    let version = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT COALESCE(MAX(version), 0)
        FROM timetable_versions
        WHERE semester_id = $1
        "#,
    )
    .bind(semester_id)
    .fetch_one(executor)
    .await?;

    Ok(version)
}

pub async fn get_max_version(pool: &Pool<Postgres>, semester_id: Uuid) -> Result<i32> {
    current_version(pool, semester_id).await
}

pub async fn get_version(
    pool: &Pool<Postgres>,
    semester_id: Uuid,
    version: i32,
) -> Result<Option<DbTimetableVersion>> {
    let row = sqlx::query_as::<_, DbTimetableVersion>(
        r#"
        SELECT id, semester_id, version, published_at, published_by, notes
        FROM timetable_versions
        WHERE semester_id = $1 AND version = $2
        "#,
    )
    .bind(semester_id)
    .bind(version)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_versions_by_semester(
    pool: &Pool<Postgres>,
    semester_id: Uuid,
) -> Result<Vec<DbTimetableVersion>> {
    let rows = sqlx::query_as::<_, DbTimetableVersion>(
        r#"
        SELECT id, semester_id, version, published_at, published_by, notes
        FROM timetable_versions
        WHERE semester_id = $1
        ORDER BY version ASC
        "#,
    )
    .bind(semester_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn publish_drafts(
    pool: &Pool<Postgres>,
    expected_current: i32,
    record: &NewVersionRecord,
) -> Result<PublishCommit> {
    let mut tx = pool.begin().await?;
    lock_semester(&mut tx, record.semester_id).await?;

    let current = current_version(&mut *tx, record.semester_id).await?;
    if current != expected_current {
        tracing::debug!(
            "Publish for semester {} is stale: expected {}, found {}",
            record.semester_id,
            expected_current,
            current
        );
        tx.rollback().await?;
        return Ok(PublishCommit::Stale { current });
    }

    let sessions_published = sqlx::query(
        r#"
        UPDATE timetable_sessions
        SET status = 'PUBLISHED', version = $2, updated_at = $3
        WHERE semester_id = $1 AND status = 'DRAFT'
        "#,
    )
    .bind(record.semester_id)
    .bind(record.version)
    .bind(record.published_at)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let version = sqlx::query_as::<_, DbTimetableVersion>(
        r#"
        INSERT INTO timetable_versions (id, semester_id, version, published_at, published_by, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, semester_id, version, published_at, published_by, notes
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.semester_id)
    .bind(record.version)
    .bind(record.published_at)
    .bind(record.published_by)
    .bind(record.notes.as_deref())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO timetable_version_sessions (version_id, session_id)
        SELECT $1, id
        FROM timetable_sessions
        WHERE semester_id = $2 AND status = 'PUBLISHED'
        "#,
    )
    .bind(version.id)
    .bind(record.semester_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(PublishCommit::Published {
        version: version.into(),
        sessions_published,
    })
}

/// Restores the published set recorded for `version`. Returns `None` when the
/// semester has no such version.
pub async fn rollback_to(
    pool: &Pool<Postgres>,
    semester_id: Uuid,
    version: i32,
) -> Result<Option<u64>> {
    let mut tx = pool.begin().await?;
    lock_semester(&mut tx, semester_id).await?;

    let version_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM timetable_versions
        WHERE semester_id = $1 AND version = $2
        "#,
    )
    .bind(semester_id)
    .bind(version)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(version_id) = version_id else {
        tx.rollback().await?;
        return Ok(None);
    };

    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE timetable_sessions
        SET status = 'DRAFT', updated_at = $3
        WHERE semester_id = $1
          AND status = 'PUBLISHED'
          AND id NOT IN (
              SELECT session_id FROM timetable_version_sessions WHERE version_id = $2
          )
        "#,
    )
    .bind(semester_id)
    .bind(version_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let restored = sqlx::query(
        r#"
        UPDATE timetable_sessions
        SET status = 'PUBLISHED',
            updated_at = CASE WHEN status = 'PUBLISHED' THEN updated_at ELSE $3 END
        WHERE semester_id = $1
          AND id IN (
              SELECT session_id FROM timetable_version_sessions WHERE version_id = $2
          )
        "#,
    )
    .bind(semester_id)
    .bind(version_id)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    tracing::info!(
        "Rolled back semester {} to version {} ({} sessions)",
        semester_id,
        version,
        restored
    );
    Ok(Some(restored))
}
