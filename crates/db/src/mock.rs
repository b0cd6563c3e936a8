mod store;

pub use store::MockTimetableStore;
