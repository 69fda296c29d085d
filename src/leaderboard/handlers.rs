use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value as JsonValue};
use tracing::{info, instrument};

use super::models::{LeaderboardEntry, Metric, RankOptions, ShinyQuery};
use crate::records::RecordKind;
use crate::shared::{AppError, AppState};

/// Every route registered under the API, reported by the descriptor endpoint.
pub const API_ROUTES: [&str; 15] = [
    "/api/v1/",
    "/api/v1/user/{username}/stats",
    "/api/v1/user/{username}/achievements",
    "/api/v1/user/{username}/cobblemon_stats",
    "/api/v1/leaderboard/pokemon_caught",
    "/api/v1/leaderboard/pokedex_caught",
    "/api/v1/leaderboard/playtime",
    "/api/v1/leaderboard/deaths",
    "/api/v1/leaderboard/sneak_time",
    "/api/v1/leaderboard/distance_traveled",
    "/api/v1/leaderboard/lootball_openned",
    "/api/v1/leaderboard/lootr_chests_openned",
    "/api/v1/leaderboard/pokemon_count",
    "/api/v1/leaderboard/money",
    "/api/v1/leaderboard/image.jpg",
];

/// Full API router. `main` layers tracing and CORS on top.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/", get(api_root))
        .route("/api/v1/user/:username/stats", get(user_stats))
        .route(
            "/api/v1/user/:username/achievements",
            get(user_achievements),
        )
        .route(
            "/api/v1/user/:username/cobblemon_stats",
            get(user_cobblemon_stats),
        )
        .route(
            "/api/v1/leaderboard/pokemon_caught",
            get(leaderboard_pokemon_caught),
        )
        .route(
            "/api/v1/leaderboard/pokedex_caught",
            get(leaderboard_pokedex_caught),
        )
        .route("/api/v1/leaderboard/playtime", get(leaderboard_playtime))
        .route("/api/v1/leaderboard/deaths", get(leaderboard_deaths))
        .route("/api/v1/leaderboard/sneak_time", get(leaderboard_sneak_time))
        .route(
            "/api/v1/leaderboard/distance_traveled",
            get(leaderboard_distance_traveled),
        )
        .route(
            "/api/v1/leaderboard/lootball_openned",
            get(leaderboard_lootball_openned),
        )
        .route(
            "/api/v1/leaderboard/lootr_chests_openned",
            get(leaderboard_lootr_chests_openned),
        )
        .route(
            "/api/v1/leaderboard/pokemon_count",
            get(leaderboard_pokemon_count),
        )
        .route("/api/v1/leaderboard/money", get(leaderboard_money))
        .route("/api/v1/leaderboard/image.jpg", get(leaderboard_image))
        .with_state(state)
}

/// GET /api/v1/
///
/// API descriptor listing every registered route.
pub async fn api_root() -> Json<JsonValue> {
    Json(json!({
        "api": "Cobblestats",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": API_ROUTES,
    }))
}

/// GET /api/v1/user/{username}/stats
#[instrument(name = "user_stats", skip(state))]
pub async fn user_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    user_record(&state, &username, RecordKind::Stats).await
}

/// GET /api/v1/user/{username}/achievements
#[instrument(name = "user_achievements", skip(state))]
pub async fn user_achievements(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    user_record(&state, &username, RecordKind::Advancements).await
}

/// GET /api/v1/user/{username}/cobblemon_stats
#[instrument(name = "user_cobblemon_stats", skip(state))]
pub async fn user_cobblemon_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    user_record(&state, &username, RecordKind::Cobblemon).await
}

/// Shared lookup behind the three per-player record endpoints: resolve the
/// name against the roster, then serve the cached record verbatim.
async fn user_record(
    state: &AppState,
    username: &str,
    kind: RecordKind,
) -> Result<Json<JsonValue>, AppError> {
    let uuid = state
        .roster
        .uuid_for_name(username)
        .await
        .ok_or(AppError::UserNotFound)?;

    let record = state
        .records
        .cached_json(kind, &uuid)
        .await
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(record))
}

pub async fn leaderboard_pokemon_caught(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::PokemonCaught, RankOptions::default()).await
}

/// GET /api/v1/leaderboard/pokedex_caught?shiny=true|false
pub async fn leaderboard_pokedex_caught(
    State(state): State<AppState>,
    Query(query): Query<ShinyQuery>,
) -> Json<Vec<JsonValue>> {
    let options = RankOptions {
        shiny_only: query.shiny,
    };
    ranked_rows(&state, Metric::PokedexCaught, options).await
}

pub async fn leaderboard_playtime(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::Playtime, RankOptions::default()).await
}

pub async fn leaderboard_deaths(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::Deaths, RankOptions::default()).await
}

pub async fn leaderboard_sneak_time(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::SneakTime, RankOptions::default()).await
}

pub async fn leaderboard_distance_traveled(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::DistanceTraveled, RankOptions::default()).await
}

pub async fn leaderboard_lootball_openned(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::LootballOpened, RankOptions::default()).await
}

pub async fn leaderboard_lootr_chests_openned(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::LootrChestsOpened, RankOptions::default()).await
}

pub async fn leaderboard_pokemon_count(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::PokemonCount, RankOptions::default()).await
}

pub async fn leaderboard_money(State(state): State<AppState>) -> Json<Vec<JsonValue>> {
    ranked_rows(&state, Metric::Money, RankOptions::default()).await
}

/// Rank and serialize: every row carries the user name plus the value under
/// the metric's own key.
async fn ranked_rows(state: &AppState, metric: Metric, options: RankOptions) -> Json<Vec<JsonValue>> {
    let entries = state.leaderboards.rank(metric, options).await;
    info!(
        metric = metric.key(),
        entries = entries.len(),
        "Serving leaderboard"
    );
    Json(entries.into_iter().map(|entry| row(entry, metric)).collect())
}

fn row(entry: LeaderboardEntry, metric: Metric) -> JsonValue {
    let mut row = Map::new();
    row.insert("user".to_string(), JsonValue::String(entry.user));
    row.insert(metric.key().to_string(), JsonValue::from(entry.value));
    JsonValue::Object(row)
}

/// GET /api/v1/leaderboard/image.jpg
///
/// Serves whatever snapshot is currently published. The snapshot task only
/// ever replaces the file atomically, so a concurrent render can never be
/// observed half-written here.
#[instrument(name = "leaderboard_image", skip(state))]
pub async fn leaderboard_image(State(state): State<AppState>) -> Result<Response, AppError> {
    match tokio::fs::read(&state.snapshot_path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("Snapshot not rendered yet".to_string()))
        }
        Err(e) => Err(AppError::Io(e)),
    }
}
