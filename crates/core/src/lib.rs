//! # Unitime core
//!
//! Domain types and the scheduling engine for university timetables: the
//! interval primitive, conflict detection across venues, lecturers and student
//! cohorts, greedy timetable generation, and the draft/publish/rollback
//! version ledger. Persistence is reached only through [`store::TimetableStore`].

pub mod engine;
pub mod errors;
pub mod models;
pub mod store;

pub use engine::{EngineOptions, TimetableEngine};
pub use errors::{TimetableError, TimetableResult};
