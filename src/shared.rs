use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::leaderboard::service::LeaderboardService;
use crate::records::service::RecordService;
use crate::roster::repository::RosterRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<dyn RosterRepository + Send + Sync>,
    pub records: Arc<RecordService>,
    pub leaderboards: Arc<LeaderboardService>,
    /// Where the snapshot task publishes the rendered leaderboard image.
    pub snapshot_path: PathBuf,
}

impl AppState {
    pub fn new(
        roster: Arc<dyn RosterRepository + Send + Sync>,
        records: Arc<RecordService>,
        leaderboards: Arc<LeaderboardService>,
        snapshot_path: PathBuf,
    ) -> Self {
        Self {
            roster,
            records,
            leaderboards,
            snapshot_path,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not found")]
    UserNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Render(_) | AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
