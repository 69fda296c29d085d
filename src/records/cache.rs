//! Bounded memoization of the expensive per-player record reads.
//!
//! Entries are never refreshed when the underlying save file changes; a value
//! survives until evicted by capacity pressure. Concurrent misses on the same
//! key may each read the file; the extractors are pure, so the duplicate work
//! is safe, merely wasted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value as Json;

use super::repository::RecordKind;

/// Cached payload: `Some` holds the parsed record, `None` remembers that the
/// player has no record of this kind. Both are first-class cache values.
pub type CachedRecord = Option<Json>;

pub const DEFAULT_CAPACITY: usize = 128;

struct CacheEntry {
    value: CachedRecord,
    /// Logical access time for LRU eviction
    last_accessed: u64,
}

#[derive(Default)]
struct Shard {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

/// LRU cache over the three JSON record kinds, one independent bound per kind.
pub struct PlayerCache {
    stats: Shard,
    advancements: Shard,
    cobblemon: Shard,
    capacity: usize,
    clock: AtomicU64,
}

impl PlayerCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            stats: Shard::default(),
            advancements: Shard::default(),
            cobblemon: Shard::default(),
            capacity,
            clock: AtomicU64::new(0),
        }
    }

    fn shard(&self, kind: RecordKind) -> &Shard {
        match kind {
            RecordKind::Stats => &self.stats,
            RecordKind::Advancements => &self.advancements,
            RecordKind::Cobblemon => &self.cobblemon,
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Look up a cached record. The outer `None` means "not yet computed";
    /// `Some(None)` means "computed, the player has no record of this kind".
    pub fn get(&self, kind: RecordKind, uuid: &str) -> Option<CachedRecord> {
        let now = self.tick();
        let mut entries = self.shard(kind).entries.lock().unwrap();
        entries.get_mut(uuid).map(|entry| {
            entry.last_accessed = now;
            entry.value.clone()
        })
    }

    /// Store a computed record, evicting the least recently used entry of the
    /// same kind when the shard is at capacity.
    pub fn put(&self, kind: RecordKind, uuid: String, value: CachedRecord) {
        let now = self.tick();
        let mut entries = self.shard(kind).entries.lock().unwrap();

        if entries.len() >= self.capacity && !entries.contains_key(&uuid) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            uuid,
            CacheEntry {
                value,
                last_accessed: now,
            },
        );
    }

    pub fn entry_count(&self, kind: RecordKind) -> usize {
        self.shard(kind).entries.lock().unwrap().len()
    }
}
