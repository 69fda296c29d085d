pub mod cache;
pub mod extract;
pub mod repository;
pub mod service;

pub use cache::PlayerCache;
pub use repository::{FileRecordRepository, InMemoryRecordRepository, RecordKind, RecordRepository};
pub use service::RecordService;
