// Library crate for the Cobblestats leaderboard server
// This file exposes the public API for integration tests

pub mod config;
pub mod leaderboard;
pub mod records;
pub mod roster;
pub mod shared;
pub mod snapshot;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use leaderboard::{api_router, LeaderboardEntry, LeaderboardService, Metric, RankOptions};
pub use records::{FileRecordRepository, PlayerCache, RecordKind, RecordService};
pub use roster::{FileRosterRepository, RosterEntry, RosterRepository};
pub use shared::{AppError, AppState};
pub use snapshot::{start_snapshot_task, SnapshotConfig};
