pub mod conflict;
pub mod requests;
pub mod resources;
pub mod session;
pub mod time;
