use std::sync::Arc;

use serde_json::Value as Json;

use super::cache::PlayerCache;
use super::repository::{RecordKind, RecordRepository};

/// Record access with memoization for the three JSON record kinds.
///
/// Storage archives are read directly on every call; only the JSON documents
/// are expensive enough to go through the cache.
pub struct RecordService {
    repository: Arc<dyn RecordRepository + Send + Sync>,
    cache: PlayerCache,
}

impl RecordService {
    pub fn new(repository: Arc<dyn RecordRepository + Send + Sync>, cache: PlayerCache) -> Self {
        Self { repository, cache }
    }

    /// Cached JSON record lookup. A miss reads and parses the file and stores
    /// the result, including "no record" for players without one.
    pub async fn cached_json(&self, kind: RecordKind, uuid: &str) -> Option<Json> {
        if let Some(cached) = self.cache.get(kind, uuid) {
            return cached;
        }

        let value = self.repository.load_json(kind, uuid).await;
        self.cache.put(kind, uuid.to_string(), value.clone());
        value
    }

    /// Uncached read of the creature-storage archive.
    pub async fn storage(&self, uuid: &str) -> Option<fastnbt::Value> {
        self.repository.load_storage(uuid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::repository::InMemoryRecordRepository;
    use serde_json::json;

    async fn service_with(records: InMemoryRecordRepository) -> RecordService {
        RecordService::new(Arc::new(records), PlayerCache::new(4))
    }

    #[tokio::test]
    async fn miss_populates_cache_and_repeats_are_identical() {
        let repo = InMemoryRecordRepository::new();
        repo.insert_json(RecordKind::Stats, "u1", json!({"a": 1}))
            .await;
        let service = service_with(repo).await;

        let first = service.cached_json(RecordKind::Stats, "u1").await;
        let second = service.cached_json(RecordKind::Stats, "u1").await;

        assert_eq!(first, Some(json!({"a": 1})));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn absence_is_memoized() {
        let service = service_with(InMemoryRecordRepository::new()).await;

        assert_eq!(service.cached_json(RecordKind::Cobblemon, "ghost").await, None);
        // The negative result itself is now cached
        assert_eq!(
            service.cache.get(RecordKind::Cobblemon, "ghost"),
            Some(None)
        );
    }

    #[tokio::test]
    async fn cached_value_survives_underlying_change() {
        let repo = Arc::new(InMemoryRecordRepository::new());
        repo.insert_json(RecordKind::Stats, "u1", json!({"v": 1}))
            .await;
        let repo_handle: Arc<dyn RecordRepository + Send + Sync> = repo.clone();
        let service = RecordService::new(repo_handle, PlayerCache::new(4));

        assert_eq!(
            service.cached_json(RecordKind::Stats, "u1").await,
            Some(json!({"v": 1}))
        );

        // Rewriting the record does not refresh the cache; staleness until
        // eviction is the documented trade-off.
        repo.insert_json(RecordKind::Stats, "u1", json!({"v": 2}))
            .await;
        assert_eq!(
            service.cached_json(RecordKind::Stats, "u1").await,
            Some(json!({"v": 1}))
        );
    }
}
