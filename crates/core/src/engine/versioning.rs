use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::TimetableEngine;
use crate::errors::{TimetableError, TimetableResult};
use crate::models::{
    requests::{PublishRequest, PublishResponse, RollbackResponse},
    session::TimetableVersion,
};
use crate::store::{NewVersionRecord, PublishCommit, TimetableStore};

impl<S: TimetableStore + ?Sized> TimetableEngine<S> {
    /// Publishes all draft sessions of the semester as the next version.
    ///
    /// The new version is one above the highest in the ledger. The store
    /// commits the status flip, the ledger row and the live-set snapshot
    /// together, and refuses if another publish got there first; in that case
    /// the read-and-commit is retried up to `publish_retries` more times.
    pub async fn publish(
        &self,
        semester_id: Uuid,
        request: PublishRequest,
    ) -> TimetableResult<PublishResponse> {
        let retries = self.options.publish_retries;
        let mut last_stale = None;

        for attempt in 0..=retries {
            let expected = self.store.max_version(semester_id).await?;
            let record = NewVersionRecord {
                semester_id,
                version: expected + 1,
                published_at: Utc::now(),
                published_by: request.published_by,
                notes: request.notes.clone(),
            };

            match self.store.publish_drafts(expected, record).await? {
                PublishCommit::Published {
                    version,
                    sessions_published,
                } => {
                    info!(
                        %semester_id,
                        version = version.version,
                        sessions_published,
                        "Published timetable"
                    );
                    return Ok(PublishResponse {
                        semester_id,
                        version: version.version,
                        sessions_published,
                    });
                }
                PublishCommit::Stale { current } => {
                    warn!(
                        %semester_id,
                        attempt,
                        retries,
                        expected,
                        current,
                        "Concurrent publish detected"
                    );
                    last_stale = Some((expected, current));
                }
            }
        }

        let (expected, found) = last_stale.unwrap_or_default();
        Err(TimetableError::VersionConflict {
            semester_id,
            expected,
            found,
        })
    }

    /// Makes `version` the live timetable of the semester again.
    ///
    /// Every published session is demoted to draft, then the sessions that were
    /// live at `version` are re-published. Later ledger entries are kept.
    pub async fn rollback(
        &self,
        semester_id: Uuid,
        version: i32,
    ) -> TimetableResult<RollbackResponse> {
        if version < 1 {
            return Err(TimetableError::Validation(format!(
                "Version must be a positive integer, got {}",
                version
            )));
        }

        self.store
            .find_version(semester_id, version)
            .await?
            .ok_or_else(|| {
                TimetableError::NotFound(format!(
                    "Version {} not found for semester {}",
                    version, semester_id
                ))
            })?;

        let sessions_restored = self.store.rollback_to(semester_id, version).await?;
        info!(%semester_id, version, sessions_restored, "Rolled back timetable");

        Ok(RollbackResponse {
            semester_id,
            version,
            sessions_restored,
        })
    }

    /// The semester's version ledger, oldest first.
    pub async fn list_versions(&self, semester_id: Uuid) -> TimetableResult<Vec<TimetableVersion>> {
        self.store.list_versions(semester_id).await
    }
}
