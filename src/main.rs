use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cobblestats::config::ServerConfig;
use cobblestats::leaderboard::{api_router, LeaderboardService};
use cobblestats::records::cache::{PlayerCache, DEFAULT_CAPACITY};
use cobblestats::records::{FileRecordRepository, RecordService};
use cobblestats::roster::{FileRosterRepository, RosterRepository};
use cobblestats::shared::AppState;
use cobblestats::snapshot::{start_snapshot_task, SnapshotConfig};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    // Initialize tracing
    let default_filter = if config.debug {
        "cobblestats=debug,tower_http=debug"
    } else {
        "cobblestats=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(data_dir = %config.data_dir.display(), "Starting Cobblestats server");

    let roster: Arc<dyn RosterRepository + Send + Sync> =
        Arc::new(FileRosterRepository::new(&config.data_dir));
    let records = Arc::new(RecordService::new(
        Arc::new(FileRecordRepository::new(&config.data_dir)),
        PlayerCache::new(DEFAULT_CAPACITY),
    ));
    let leaderboards = Arc::new(LeaderboardService::new(
        Arc::clone(&roster),
        Arc::clone(&records),
    ));

    // The renderer loop runs for the process lifetime, independent of the
    // request path; they only share the record cache and the published file.
    let snapshot_config = SnapshotConfig {
        render_interval: config.snapshot_interval,
        background_path: config.background_path.clone(),
        font_path: config.font_path.clone(),
        output_path: config.snapshot_path.clone(),
    };
    tokio::spawn(start_snapshot_task(
        Arc::clone(&leaderboards),
        snapshot_config,
    ));

    let state = AppState::new(roster, records, leaderboards, config.snapshot_path.clone());
    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{addr}");
    axum::serve(listener, app).await.unwrap();
}
