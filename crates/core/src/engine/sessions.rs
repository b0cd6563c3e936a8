use tracing::info;
use uuid::Uuid;

use super::TimetableEngine;
use crate::errors::{TimetableError, TimetableResult};
use crate::models::session::{Placement, TimetableSession};
use crate::store::TimetableStore;

impl<S: TimetableStore + ?Sized> TimetableEngine<S> {
    /// Creates a draft session, refusing placements that conflict.
    pub async fn create_session(&self, placement: Placement) -> TimetableResult<TimetableSession> {
        let conflicts = self.check_conflicts(&placement, None).await?;
        if !conflicts.is_empty() {
            return Err(TimetableError::Conflicts(conflicts));
        }

        let mut created = self
            .store
            .create_sessions(vec![TimetableSession::draft(placement)])
            .await?;
        let session = created
            .pop()
            .ok_or_else(|| TimetableError::Database(eyre::eyre!("Session insert returned no rows")))?;

        info!(session_id = %session.id, course_id = %session.course_id, "Created draft session");
        Ok(session)
    }

    /// Moves a draft session to a new placement.
    ///
    /// Published sessions belong to a version and cannot be edited.
    pub async fn update_session(
        &self,
        id: Uuid,
        placement: Placement,
    ) -> TimetableResult<TimetableSession> {
        let current = self
            .store
            .get_session(id)
            .await?
            .ok_or_else(|| TimetableError::NotFound(format!("Session {} not found", id)))?;

        if current.is_published() {
            return Err(TimetableError::Validation(format!(
                "Session {} is published in version {} and cannot be edited",
                id, current.version
            )));
        }
        if current.semester_id != placement.semester_id {
            return Err(TimetableError::Validation(format!(
                "Session {} belongs to semester {}",
                id, current.semester_id
            )));
        }

        let conflicts = self.check_conflicts(&placement, Some(id)).await?;
        if !conflicts.is_empty() {
            return Err(TimetableError::Conflicts(conflicts));
        }

        let session = self.store.update_session_placement(id, &placement).await?;
        info!(session_id = %id, "Updated draft session");
        Ok(session)
    }
}
