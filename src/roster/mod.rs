pub mod models;
pub mod repository;

pub use models::RosterEntry;
pub use repository::{FileRosterRepository, InMemoryRosterRepository, RosterRepository};
