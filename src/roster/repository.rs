use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::models::RosterEntry;

/// Lookup between player UUIDs and display names, backed by the server roster.
///
/// Implementations read fresh on every call. The roster changes when players
/// join or leave and must never be served stale, so there is deliberately no
/// caching at this layer.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// All known players, in roster file order. Empty when the roster is
    /// missing or unreadable.
    async fn all_players(&self) -> Vec<RosterEntry>;

    async fn name_for_uuid(&self, uuid: &str) -> Option<String>;

    async fn uuid_for_name(&self, name: &str) -> Option<String>;
}

/// Roster backed by the server's `usercache.json`.
pub struct FileRosterRepository {
    path: PathBuf,
}

impl FileRosterRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("usercache.json"),
        }
    }

    async fn read_entries(&self) -> Vec<RosterEntry> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "usercache.json not readable");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "usercache.json is not valid JSON");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RosterRepository for FileRosterRepository {
    async fn all_players(&self) -> Vec<RosterEntry> {
        self.read_entries().await
    }

    async fn name_for_uuid(&self, uuid: &str) -> Option<String> {
        self.read_entries()
            .await
            .into_iter()
            .find(|entry| entry.uuid == uuid)
            .map(|entry| entry.name)
    }

    async fn uuid_for_name(&self, name: &str) -> Option<String> {
        self.read_entries()
            .await
            .into_iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.uuid)
    }
}

/// Fixed in-memory roster, for tests.
#[derive(Debug, Default)]
pub struct InMemoryRosterRepository {
    entries: Vec<RosterEntry>,
}

impl InMemoryRosterRepository {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn all_players(&self) -> Vec<RosterEntry> {
        self.entries.clone()
    }

    async fn name_for_uuid(&self, uuid: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.uuid == uuid)
            .map(|entry| entry.name.clone())
    }

    async fn uuid_for_name(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.uuid.clone())
    }
}
