use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use tokio::time::interval;
use tracing::{error, info, instrument};

use super::renderer::{Alignment, Column, SnapshotRenderer, TOP_N};
use crate::leaderboard::models::{Metric, RankOptions};
use crate::leaderboard::service::LeaderboardService;
use crate::shared::AppError;

/// Configuration for the snapshot render task
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// How often a new snapshot is rendered
    pub render_interval: Duration,
    pub background_path: PathBuf,
    pub font_path: PathBuf,
    /// Where the finished artifact is published
    pub output_path: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            render_interval: Duration::from_secs(120),
            background_path: PathBuf::from("assets/background.jpg"),
            font_path: PathBuf::from("assets/font.ttf"),
            output_path: PathBuf::from("leaderboard.jpg"),
        }
    }
}

/// Starts the background task that re-renders the leaderboard snapshot on a
/// fixed cadence, for the lifetime of the process. A failed cycle is logged
/// and the next one runs anyway.
#[instrument(skip(leaderboards))]
pub async fn start_snapshot_task(leaderboards: Arc<LeaderboardService>, config: SnapshotConfig) {
    info!(
        interval_secs = config.render_interval.as_secs(),
        output = %config.output_path.display(),
        "Starting snapshot render task"
    );

    let mut render_interval = interval(config.render_interval);

    loop {
        render_interval.tick().await;

        match render_cycle(&leaderboards, &config).await {
            Ok(()) => {
                info!(output = %config.output_path.display(), "Snapshot published");
            }
            Err(e) => {
                error!(error = %e, "Snapshot cycle failed");
            }
        }
    }
}

/// One render cycle: rank the three featured metrics, draw them onto the
/// background, publish atomically.
async fn render_cycle(
    leaderboards: &Arc<LeaderboardService>,
    config: &SnapshotConfig,
) -> Result<(), AppError> {
    let renderer = SnapshotRenderer::load(&config.font_path)?;
    let background = image::open(&config.background_path)
        .map_err(|e| AppError::Render(format!("background image: {e}")))?
        .to_rgb8();

    let mut discoveries = leaderboards
        .rank(Metric::PokedexCaught, RankOptions::default())
        .await;
    let mut captures = leaderboards
        .rank(Metric::PokemonCaught, RankOptions::default())
        .await;
    let mut playtime = leaderboards
        .rank(Metric::Playtime, RankOptions::default())
        .await;
    discoveries.truncate(TOP_N);
    captures.truncate(TOP_N);
    playtime.truncate(TOP_N);

    let columns = [
        Column {
            header: "Pokedex",
            alignment: Alignment::Left,
            entries: discoveries,
        },
        Column {
            header: "Captures",
            alignment: Alignment::Center,
            entries: captures,
        },
        Column {
            header: "Playtime (min)",
            alignment: Alignment::Right,
            entries: playtime,
        },
    ];

    let rendered = renderer.render(background, &columns);
    publish(&rendered, &config.output_path).await
}

/// Encode and atomically replace the published artifact. The temp file lives
/// next to the final one so the rename never crosses filesystems; a reader
/// of the output path only ever sees a complete image.
async fn publish(rendered: &RgbImage, output_path: &Path) -> Result<(), AppError> {
    let mut encoded = Vec::new();
    rendered
        .write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)
        .map_err(|e| AppError::Render(format!("jpeg encode: {e}")))?;

    let tmp_path = output_path.with_extension("jpg.tmp");
    tokio::fs::write(&tmp_path, &encoded).await?;
    tokio::fs::rename(&tmp_path, output_path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::cache::PlayerCache;
    use crate::records::repository::InMemoryRecordRepository;
    use crate::records::service::RecordService;
    use crate::roster::repository::{InMemoryRosterRepository, RosterRepository};

    fn empty_leaderboards() -> Arc<LeaderboardService> {
        let roster: Arc<dyn RosterRepository + Send + Sync> =
            Arc::new(InMemoryRosterRepository::new(Vec::new()));
        Arc::new(LeaderboardService::new(
            roster,
            Arc::new(RecordService::new(
                Arc::new(InMemoryRecordRepository::new()),
                PlayerCache::new(4),
            )),
        ))
    }

    #[tokio::test]
    async fn publish_replaces_the_artifact_with_a_complete_image() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("leaderboard.jpg");
        let rendered = RgbImage::from_pixel(32, 16, image::Rgb([10, 20, 30]));

        publish(&rendered, &output).await.unwrap();

        // The temp file is gone and the published file decodes cleanly
        assert!(!output.with_extension("jpg.tmp").exists());
        let bytes = std::fs::read(&output).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 16);
    }

    #[tokio::test]
    async fn publish_overwrites_a_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("leaderboard.jpg");

        publish(&RgbImage::new(8, 8), &output).await.unwrap();
        let first = std::fs::read(&output).unwrap();

        publish(&RgbImage::from_pixel(16, 16, image::Rgb([200, 0, 0])), &output)
            .await
            .unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_ne!(first, second);
        assert_eq!(image::load_from_memory(&second).unwrap().width(), 16);
    }

    #[tokio::test]
    async fn cycle_with_missing_assets_errors_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let config = SnapshotConfig {
            render_interval: Duration::from_secs(120),
            background_path: dir.path().join("missing-background.jpg"),
            font_path: dir.path().join("missing-font.ttf"),
            output_path: dir.path().join("leaderboard.jpg"),
        };

        let result = render_cycle(&empty_leaderboards(), &config).await;

        assert!(result.is_err());
        assert!(!config.output_path.exists());
    }
}
