pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::api_router;
pub use models::{LeaderboardEntry, Metric, RankOptions};
pub use service::LeaderboardService;
