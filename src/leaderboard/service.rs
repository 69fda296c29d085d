use std::sync::Arc;

use fastnbt::Value as Nbt;
use serde_json::Value as Json;
use tracing::debug;

use super::models::{LeaderboardEntry, Metric, RankOptions};
use crate::records::{extract, RecordKind, RecordService};
use crate::roster::repository::RosterRepository;

/// Ranks the full player population by one metric.
///
/// Every call is a fresh full scan of the roster; nothing about a ranking is
/// persisted. With unchanged source files the result is deterministic.
pub struct LeaderboardService {
    roster: Arc<dyn RosterRepository + Send + Sync>,
    records: Arc<RecordService>,
}

impl LeaderboardService {
    pub fn new(
        roster: Arc<dyn RosterRepository + Send + Sync>,
        records: Arc<RecordService>,
    ) -> Self {
        Self { roster, records }
    }

    /// Full ranking for one metric, descending by value. Players without the
    /// backing record are skipped entirely; ties keep roster order because
    /// the sort is stable.
    pub async fn rank(&self, metric: Metric, options: RankOptions) -> Vec<LeaderboardEntry> {
        let roster = self.roster.all_players().await;
        let mut entries = Vec::new();

        for player in roster {
            if let Some(value) = self.metric_value(metric, options, &player.uuid).await {
                entries.push(LeaderboardEntry::new(player.name, value));
            }
        }

        entries.sort_by(|a, b| b.value.cmp(&a.value));

        debug!(
            metric = metric.key(),
            entries = entries.len(),
            "Leaderboard computed"
        );
        entries
    }

    /// Top entry only. Reuses the same full scan as `rank` so the extraction
    /// rules live in one place.
    pub async fn top_entry(
        &self,
        metric: Metric,
        options: RankOptions,
    ) -> Option<LeaderboardEntry> {
        self.rank(metric, options).await.into_iter().next()
    }

    async fn metric_value(&self, metric: Metric, options: RankOptions, uuid: &str) -> Option<i64> {
        match metric {
            Metric::PokemonCaught => {
                self.from_json(RecordKind::Cobblemon, uuid, extract::pokemon_caught)
                    .await
            }
            Metric::PokedexCaught => {
                let record = self
                    .records
                    .cached_json(RecordKind::Cobblemon, uuid)
                    .await?;
                Some(extract::pokedex_discovered(&record, options.shiny_only))
            }
            Metric::Playtime => {
                self.from_json(RecordKind::Stats, uuid, extract::play_time_minutes)
                    .await
            }
            Metric::Deaths => self.from_json(RecordKind::Stats, uuid, extract::deaths).await,
            Metric::SneakTime => {
                self.from_json(RecordKind::Stats, uuid, extract::sneak_time_minutes)
                    .await
            }
            Metric::DistanceTraveled => {
                self.from_json(RecordKind::Stats, uuid, extract::distance_traveled_meters)
                    .await
            }
            Metric::LootballOpened => {
                self.from_json(RecordKind::Stats, uuid, extract::loot_balls_opened)
                    .await
            }
            Metric::LootrChestsOpened => {
                self.from_json(RecordKind::Stats, uuid, extract::lootr_chests_opened)
                    .await
            }
            Metric::PokemonCount => self.from_storage(uuid, extract::pokemon_count).await,
            Metric::Money => self.from_storage(uuid, extract::money_balance).await,
        }
    }

    async fn from_json(
        &self,
        kind: RecordKind,
        uuid: &str,
        extractor: fn(&Json) -> i64,
    ) -> Option<i64> {
        let record = self.records.cached_json(kind, uuid).await?;
        Some(extractor(&record))
    }

    async fn from_storage(&self, uuid: &str, extractor: fn(&Nbt) -> i64) -> Option<i64> {
        let storage = self.records.storage(uuid).await?;
        Some(extractor(&storage))
    }
}
