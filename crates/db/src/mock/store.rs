use async_trait::async_trait;
use mockall::mock;
use unitime_core::{
    errors::TimetableResult,
    models::{
        resources::{AllocatedCourse, LecturerAvailability, StudentCourseRegistration, Venue},
        session::{Placement, ScheduledSession, TimetableSession, TimetableVersion},
    },
    store::{NewVersionRecord, PublishCommit, SessionQuery, TimetableStore},
};
use uuid::Uuid;

// Mock store for exercising engine failure paths
mock! {
    pub TimetableStore {}

    #[async_trait]
    impl TimetableStore for TimetableStore {
        async fn find_sessions(&self, query: &SessionQuery) -> TimetableResult<Vec<ScheduledSession>>;

        async fn get_session(&self, id: Uuid) -> TimetableResult<Option<TimetableSession>>;

        async fn active_registrations(
            &self,
            course_id: Uuid,
            semester_id: Uuid,
        ) -> TimetableResult<Vec<StudentCourseRegistration>>;

        async fn lecturer_availability(
            &self,
            lecturer_id: Uuid,
        ) -> TimetableResult<Vec<LecturerAvailability>>;

        async fn venues_by_capacity(&self) -> TimetableResult<Vec<Venue>>;

        async fn allocations_for_semester(
            &self,
            semester_id: Uuid,
        ) -> TimetableResult<Vec<AllocatedCourse>>;

        async fn max_version(&self, semester_id: Uuid) -> TimetableResult<i32>;

        async fn find_version(
            &self,
            semester_id: Uuid,
            version: i32,
        ) -> TimetableResult<Option<TimetableVersion>>;

        async fn list_versions(&self, semester_id: Uuid) -> TimetableResult<Vec<TimetableVersion>>;

        async fn create_sessions(
            &self,
            sessions: Vec<TimetableSession>,
        ) -> TimetableResult<Vec<TimetableSession>>;

        async fn update_session_placement(
            &self,
            id: Uuid,
            placement: &Placement,
        ) -> TimetableResult<TimetableSession>;

        async fn publish_drafts(
            &self,
            expected_current: i32,
            record: NewVersionRecord,
        ) -> TimetableResult<PublishCommit>;

        async fn rollback_to(&self, semester_id: Uuid, version: i32) -> TimetableResult<u64>;
    }
}
