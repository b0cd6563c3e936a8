use async_trait::async_trait;
use eyre::Result;
use unitime_core::{
    errors::{TimetableError, TimetableResult},
    models::{
        resources::{AllocatedCourse, LecturerAvailability, StudentCourseRegistration, Venue},
        session::{Placement, ScheduledSession, TimetableSession, TimetableVersion},
    },
    store::{NewVersionRecord, PublishCommit, SessionQuery, TimetableStore},
};
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{catalog, sessions, versions};

/// [`TimetableStore`] backed by Postgres.
#[derive(Clone)]
pub struct PgTimetableStore {
    pool: DbPool,
}

impl PgTimetableStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl TimetableStore for PgTimetableStore {
    async fn find_sessions(&self, query: &SessionQuery) -> TimetableResult<Vec<ScheduledSession>> {
        let rows = sessions::find_sessions(&self.pool, query).await?;
        Ok(convert_all(rows)?)
    }

    async fn get_session(&self, id: Uuid) -> TimetableResult<Option<TimetableSession>> {
        let row = sessions::get_session_by_id(&self.pool, id).await?;
        Ok(row.map(TimetableSession::try_from).transpose()?)
    }

    async fn active_registrations(
        &self,
        course_id: Uuid,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<StudentCourseRegistration>> {
        let rows = catalog::get_active_registrations(&self.pool, course_id, semester_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn lecturer_availability(
        &self,
        lecturer_id: Uuid,
    ) -> TimetableResult<Vec<LecturerAvailability>> {
        let rows = catalog::get_lecturer_availability(&self.pool, lecturer_id).await?;
        Ok(convert_all(rows)?)
    }

    async fn venues_by_capacity(&self) -> TimetableResult<Vec<Venue>> {
        let rows = catalog::get_venues_by_capacity(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn allocations_for_semester(
        &self,
        semester_id: Uuid,
    ) -> TimetableResult<Vec<AllocatedCourse>> {
        let rows = catalog::get_allocations_for_semester(&self.pool, semester_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn max_version(&self, semester_id: Uuid) -> TimetableResult<i32> {
        Ok(versions::get_max_version(&self.pool, semester_id).await?)
    }

    async fn find_version(
        &self,
        semester_id: Uuid,
        version: i32,
    ) -> TimetableResult<Option<TimetableVersion>> {
        let row = versions::get_version(&self.pool, semester_id, version).await?;
        Ok(row.map(Into::into))
    }

    async fn list_versions(&self, semester_id: Uuid) -> TimetableResult<Vec<TimetableVersion>> {
        let rows = versions::get_versions_by_semester(&self.pool, semester_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_sessions(
        &self,
        new_sessions: Vec<TimetableSession>,
    ) -> TimetableResult<Vec<TimetableSession>> {
        let rows = sessions::insert_sessions(&self.pool, &new_sessions).await?;
        Ok(convert_all(rows)?)
    }

    async fn update_session_placement(
        &self,
        id: Uuid,
        placement: &Placement,
    ) -> TimetableResult<TimetableSession> {
        let row = sessions::update_draft_placement(&self.pool, id, placement)
            .await?
            .ok_or_else(|| TimetableError::NotFound(format!("Draft session {} not found", id)))?;
        Ok(TimetableSession::try_from(row)?)
    }

    async fn publish_drafts(
        &self,
        expected_current: i32,
        record: NewVersionRecord,
    ) -> TimetableResult<PublishCommit> {
        Ok(versions::publish_drafts(&self.pool, expected_current, &record).await?)
    }

    async fn rollback_to(&self, semester_id: Uuid, version: i32) -> TimetableResult<u64> {
        versions::rollback_to(&self.pool, semester_id, version)
            .await?
            .ok_or_else(|| {
                TimetableError::NotFound(format!(
                    "Version {} not found for semester {}",
                    version, semester_id
                ))
            })
    }
}
