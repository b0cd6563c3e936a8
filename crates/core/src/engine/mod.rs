//! # Timetable engine
//!
//! Stateless operations over a [`TimetableStore`]:
//!
//! - **Conflict detection** ([`TimetableEngine::check_conflicts`]): venue,
//!   lecturer and student-cohort double-booking checks for one placement.
//! - **Generation** ([`TimetableEngine::generate_timetable`]): greedy first-fit
//!   placement of every allocation in a semester as draft sessions.
//! - **Versioning** ([`TimetableEngine::publish`], [`TimetableEngine::rollback`]):
//!   the draft/published lifecycle and the per-semester version ledger.
//! - **Manual sessions** ([`TimetableEngine::create_session`],
//!   [`TimetableEngine::update_session`]): single-session writes gated by the
//!   conflict check.
//!
//! The semester is always an explicit argument; the engine never assumes a
//! "current" semester.

mod conflicts;
mod generator;
mod sessions;
mod versioning;

use std::sync::Arc;

use crate::store::TimetableStore;

/// Tunables for engine operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Extra attempts `publish` makes after its first when a concurrent
    /// publish advances the semester between reading and committing. Zero
    /// means a single attempt.
    pub publish_retries: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { publish_retries: 3 }
    }
}

pub struct TimetableEngine<S: ?Sized = dyn TimetableStore> {
    store: Arc<S>,
    options: EngineOptions,
}

impl<S: ?Sized> Clone for TimetableEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options.clone(),
        }
    }
}

impl<S: TimetableStore + ?Sized> TimetableEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}
