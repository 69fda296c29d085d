use std::path::PathBuf;
use std::time::Duration;

/// Server configuration read from the environment.
///
/// Every knob has a default so the binary runs out of the box against a world
/// save in the current directory.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Root of the server data: `usercache.json` and `world/` live here.
    pub data_dir: PathBuf,
    /// Background image the snapshot is drawn onto.
    pub background_path: PathBuf,
    /// TrueType font used by the snapshot renderer.
    pub font_path: PathBuf,
    /// Published snapshot artifact, served as `/api/v1/leaderboard/image.jpg`.
    pub snapshot_path: PathBuf,
    pub snapshot_interval: Duration,
}

impl ServerConfig {
    /// Loads configuration from `COBBLESTATS_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let host = env_or("COBBLESTATS_HOST", "0.0.0.0");
        let port = env_parsed("COBBLESTATS_PORT", 5000);
        let debug = env_or("COBBLESTATS_DEBUG", "false") == "true";
        let data_dir = PathBuf::from(env_or("COBBLESTATS_DATA_DIR", "./"));
        let background_path =
            PathBuf::from(env_or("COBBLESTATS_BACKGROUND", "assets/background.jpg"));
        let font_path = PathBuf::from(env_or("COBBLESTATS_FONT", "assets/font.ttf"));
        let snapshot_path = PathBuf::from(env_or("COBBLESTATS_SNAPSHOT", "leaderboard.jpg"));
        let snapshot_interval =
            Duration::from_secs(env_parsed("COBBLESTATS_SNAPSHOT_INTERVAL_SECS", 120));

        Self {
            host,
            port,
            debug,
            data_dir,
            background_path,
            font_path,
            snapshot_path,
            snapshot_interval,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
