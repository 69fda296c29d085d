use serde::Deserialize;

/// A metric a leaderboard can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    PokemonCaught,
    PokedexCaught,
    Playtime,
    Deaths,
    SneakTime,
    DistanceTraveled,
    LootballOpened,
    LootrChestsOpened,
    PokemonCount,
    Money,
}

impl Metric {
    /// JSON key the metric's value is published under in leaderboard rows.
    /// The two loot keys keep their historical spelling; clients depend on it.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::PokemonCaught => "pokemon_caught",
            Metric::PokedexCaught => "pokedex_caught",
            Metric::Playtime => "playtime",
            Metric::Deaths => "deaths",
            Metric::SneakTime => "sneak_time",
            Metric::DistanceTraveled => "distance_traveled",
            Metric::LootballOpened => "lootball_openned",
            Metric::LootrChestsOpened => "lootr_chests_openned",
            Metric::PokemonCount => "pokemon_count",
            Metric::Money => "money",
        }
    }
}

/// Metric-specific ranking flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankOptions {
    /// Count only the shiny entries of the discovery registry.
    pub shiny_only: bool,
}

/// One ranked row: a display name and the metric value for that player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user: String,
    pub value: i64,
}

impl LeaderboardEntry {
    pub fn new(user: impl Into<String>, value: i64) -> Self {
        Self {
            user: user.into(),
            value,
        }
    }
}

/// Query parameters of the pokedex leaderboard.
#[derive(Debug, Deserialize)]
pub struct ShinyQuery {
    #[serde(default)]
    pub shiny: bool,
}
