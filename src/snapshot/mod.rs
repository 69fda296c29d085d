pub mod renderer;
pub mod task;

pub use renderer::{Alignment, Column, SnapshotRenderer, TOP_N};
pub use task::{start_snapshot_task, SnapshotConfig};
