use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// The per-player JSON record kinds persisted in the world save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Vanilla statistics document (`world/stats/<uuid>.json`)
    Stats,
    /// Advancements document (`world/advancements/<uuid>.json`)
    Advancements,
    /// Cobblemon player data (`world/cobblemonplayerdata/<shard>/<uuid>.json`)
    Cobblemon,
}

/// Access to the per-player records of the world save.
///
/// Absence is a valid state, never an error: a missing or unreadable file
/// simply means the player contributes nothing to aggregates.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Load one JSON record for a player, or `None` when the file is missing
    /// or does not parse.
    async fn load_json(&self, kind: RecordKind, uuid: &str) -> Option<Json>;

    /// Load the gzipped NBT creature-storage archive for a player.
    async fn load_storage(&self, uuid: &str) -> Option<fastnbt::Value>;
}

/// Record repository reading straight from the world save directory.
pub struct FileRecordRepository {
    data_dir: PathBuf,
}

impl FileRecordRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn json_path(&self, kind: RecordKind, uuid: &str) -> PathBuf {
        let file = format!("{uuid}.json");
        match kind {
            RecordKind::Stats => self.data_dir.join("world").join("stats").join(file),
            RecordKind::Advancements => {
                self.data_dir.join("world").join("advancements").join(file)
            }
            RecordKind::Cobblemon => self
                .data_dir
                .join("world")
                .join("cobblemonplayerdata")
                .join(shard(uuid))
                .join(file),
        }
    }

    fn storage_path(&self, uuid: &str) -> PathBuf {
        self.data_dir
            .join("world")
            .join("pokemon")
            .join("pcstore")
            .join(shard(uuid))
            .join(format!("{uuid}.dat"))
    }

    async fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "record file not present");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "record file not readable");
                None
            }
        }
    }
}

/// Mod player data is sharded into subdirectories keyed by the first two
/// characters of the UUID.
fn shard(uuid: &str) -> &str {
    uuid.get(0..2).unwrap_or(uuid)
}

/// Decode an NBT archive, transparently handling gzip compression.
fn decode_nbt(bytes: &[u8]) -> Result<fastnbt::Value, String> {
    let raw = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| format!("gzip: {e}"))?;
        decompressed
    } else {
        bytes.to_vec()
    };
    fastnbt::from_bytes(&raw).map_err(|e| e.to_string())
}

#[async_trait]
impl RecordRepository for FileRecordRepository {
    async fn load_json(&self, kind: RecordKind, uuid: &str) -> Option<Json> {
        let path = self.json_path(kind, uuid);
        let bytes = self.read_file(&path).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "record file is not valid JSON");
                None
            }
        }
    }

    async fn load_storage(&self, uuid: &str) -> Option<fastnbt::Value> {
        let path = self.storage_path(uuid);
        let bytes = self.read_file(&path).await?;
        match decode_nbt(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "storage archive is not valid NBT");
                None
            }
        }
    }
}

/// Record repository over plain maps, for tests.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    json: RwLock<HashMap<(RecordKind, String), Json>>,
    storage: RwLock<HashMap<String, fastnbt::Value>>,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_json(&self, kind: RecordKind, uuid: &str, value: Json) {
        self.json
            .write()
            .await
            .insert((kind, uuid.to_string()), value);
    }

    pub async fn insert_storage(&self, uuid: &str, value: fastnbt::Value) {
        self.storage.write().await.insert(uuid.to_string(), value);
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn load_json(&self, kind: RecordKind, uuid: &str) -> Option<Json> {
        self.json
            .read()
            .await
            .get(&(kind, uuid.to_string()))
            .cloned()
    }

    async fn load_storage(&self, uuid: &str) -> Option<fastnbt::Value> {
        self.storage.read().await.get(uuid).cloned()
    }
}
