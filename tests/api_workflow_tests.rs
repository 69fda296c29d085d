//! End-to-end tests driving the API router over a real world-save fixture
//! directory: roster file, sharded JSON records and gzipped NBT archives.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt; // for `oneshot`

use cobblestats::leaderboard::{api_router, LeaderboardService};
use cobblestats::records::cache::{PlayerCache, DEFAULT_CAPACITY};
use cobblestats::records::{FileRecordRepository, RecordService};
use cobblestats::roster::{FileRosterRepository, RosterRepository};
use cobblestats::shared::AppState;

const ANN: &str = "11111111-2222-3333-4444-555555555555";
const BO: &str = "66666666-7777-8888-9999-aaaaaaaaaaaa";
const CY: &str = "bbbbbbbb-cccc-dddd-eeee-ffffffffffff";

fn write_file(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn write_roster(root: &Path, entries: &[(&str, &str)]) {
    let entries: Vec<JsonValue> = entries
        .iter()
        .map(|(uuid, name)| json!({"uuid": uuid, "name": name}))
        .collect();
    write_file(
        root,
        "usercache.json",
        serde_json::to_string(&entries).unwrap().as_bytes(),
    );
}

fn write_stats(root: &Path, uuid: &str, custom: JsonValue) {
    write_file(
        root,
        &format!("world/stats/{uuid}.json"),
        json!({"stats": {"minecraft:custom": custom}})
            .to_string()
            .as_bytes(),
    );
}

fn write_cobblemon(root: &Path, uuid: &str, extra_data: JsonValue) {
    write_file(
        root,
        &format!("world/cobblemonplayerdata/{}/{uuid}.json", &uuid[0..2]),
        json!({"extraData": extra_data}).to_string().as_bytes(),
    );
}

fn write_storage(root: &Path, uuid: &str, archive: &fastnbt::Value) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&fastnbt::to_bytes(archive).unwrap())
        .unwrap();
    write_file(
        root,
        &format!("world/pokemon/pcstore/{}/{uuid}.dat", &uuid[0..2]),
        &encoder.finish().unwrap(),
    );
}

fn app(root: &Path) -> Router {
    let roster: Arc<dyn RosterRepository + Send + Sync> =
        Arc::new(FileRosterRepository::new(root));
    let records = Arc::new(RecordService::new(
        Arc::new(FileRecordRepository::new(root)),
        PlayerCache::new(DEFAULT_CAPACITY),
    ));
    let leaderboards = Arc::new(LeaderboardService::new(
        Arc::clone(&roster),
        Arc::clone(&records),
    ));
    let state = AppState::new(roster, records, leaderboards, root.join("leaderboard.jpg"));
    api_router(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, JsonValue) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn deaths_leaderboard_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann"), (BO, "Bo")]);
    write_stats(dir.path(), ANN, json!({"minecraft:deaths": 3}));
    // Bo has no stats record at all

    let (status, body) = get_json(app(dir.path()), "/api/v1/leaderboard/deaths").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"user": "Ann", "deaths": 3}]));
}

#[tokio::test]
async fn playtime_truncates_tick_counts_to_minutes() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann"), (BO, "Bo")]);
    write_stats(dir.path(), ANN, json!({"minecraft:play_time": 1200}));
    write_stats(dir.path(), BO, json!({"minecraft:play_time": 1199}));

    let (_, body) = get_json(app(dir.path()), "/api/v1/leaderboard/playtime").await;

    assert_eq!(
        body,
        json!([
            {"user": "Ann", "playtime": 1},
            {"user": "Bo", "playtime": 0}
        ])
    );
}

#[tokio::test]
async fn distance_sums_sub_counters_in_centimeters() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann")]);
    write_stats(
        dir.path(),
        ANN,
        json!({
            "minecraft:walk_one_cm": 12345,
            "minecraft:sprint_one_cm": 12345,
            "minecraft:crouch_one_cm": 12345,
            "minecraft:swim_one_cm": 12345,
            "minecraft:fall_one_cm": 12345,
            "minecraft:climb_one_cm": 12345,
            "minecraft:fly_one_cm": 12345,
            "minecraft:walk_on_water_one_cm": 12345
        }),
    );

    let (_, body) = get_json(app(dir.path()), "/api/v1/leaderboard/distance_traveled").await;

    assert_eq!(body, json!([{"user": "Ann", "distance_traveled": 987}]));
}

#[tokio::test]
async fn pokedex_leaderboard_with_and_without_shiny_filter() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann")]);
    write_cobblemon(
        dir.path(),
        ANN,
        json!({"cobbledex_discovery": {"registers": {
            "a": {"normal": {"isShiny": true}},
            "b": {"normal": {"isShiny": true}},
            "c": {"normal": {"isShiny": false}},
            "d": {"normal": {}},
            "e": {}
        }}}),
    );

    let (_, all) = get_json(app(dir.path()), "/api/v1/leaderboard/pokedex_caught").await;
    let (_, shiny) = get_json(
        app(dir.path()),
        "/api/v1/leaderboard/pokedex_caught?shiny=true",
    )
    .await;
    let (_, not_shiny) = get_json(
        app(dir.path()),
        "/api/v1/leaderboard/pokedex_caught?shiny=false",
    )
    .await;

    assert_eq!(all, json!([{"user": "Ann", "pokedex_caught": 5}]));
    assert_eq!(shiny, json!([{"user": "Ann", "pokedex_caught": 2}]));
    assert_eq!(not_shiny, all);
}

#[tokio::test]
async fn storage_backed_leaderboards_read_gzipped_archives() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann"), (BO, "Bo"), (CY, "Cy")]);
    write_storage(
        dir.path(),
        ANN,
        &fastnbt::nbt!({
            "Money": 500_i64,
            "Box0": {"Slot0": {}, "Slot1": {}, "Slot2": {}},
            "BackupBox0": {"Slot0": {}}
        }),
    );
    write_storage(dir.path(), BO, &fastnbt::nbt!({"Box1": {"Slot0": {}}}));
    // Cy has no storage archive

    let (_, count) = get_json(app(dir.path()), "/api/v1/leaderboard/pokemon_count").await;
    let (_, money) = get_json(app(dir.path()), "/api/v1/leaderboard/money").await;

    assert_eq!(
        count,
        json!([
            {"user": "Ann", "pokemon_count": 4},
            {"user": "Bo", "pokemon_count": 1}
        ])
    );
    assert_eq!(
        money,
        json!([
            {"user": "Ann", "money": 500},
            {"user": "Bo", "money": 0}
        ])
    );
}

#[tokio::test]
async fn ordering_is_descending_and_ties_keep_roster_order() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann"), (BO, "Bo"), (CY, "Cy")]);
    write_stats(dir.path(), ANN, json!({"minecraft:deaths": 4}));
    write_stats(dir.path(), BO, json!({"minecraft:deaths": 9}));
    write_stats(dir.path(), CY, json!({"minecraft:deaths": 4}));

    let (_, body) = get_json(app(dir.path()), "/api/v1/leaderboard/deaths").await;

    // Bo first, then Ann before Cy: equal values keep roster order
    assert_eq!(
        body,
        json!([
            {"user": "Bo", "deaths": 9},
            {"user": "Ann", "deaths": 4},
            {"user": "Cy", "deaths": 4}
        ])
    );
}

#[tokio::test]
async fn user_record_endpoints_serve_documents_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann")]);
    write_stats(dir.path(), ANN, json!({"minecraft:deaths": 1}));
    write_file(
        dir.path(),
        &format!("world/advancements/{ANN}.json"),
        br#"{"minecraft:story/mine_stone": {"done": true}}"#,
    );

    let (status, stats) = get_json(app(dir.path()), "/api/v1/user/Ann/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({"stats": {"minecraft:custom": {"minecraft:deaths": 1}}})
    );

    let (status, advancements) = get_json(app(dir.path()), "/api/v1/user/Ann/achievements").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        advancements,
        json!({"minecraft:story/mine_stone": {"done": true}})
    );
}

#[tokio::test]
async fn unknown_user_and_missing_records_are_404() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann")]);

    let (status, body) = get_json(app(dir.path()), "/api/v1/user/Ghost/stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));

    // On the roster, but no cobblemon record on disk
    let (status, body) = get_json(app(dir.path()), "/api/v1/user/Ann/cobblemon_stats").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));
}

#[tokio::test]
async fn missing_roster_degrades_every_leaderboard_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    // No usercache.json written at all

    for route in [
        "/api/v1/leaderboard/deaths",
        "/api/v1/leaderboard/pokemon_caught",
        "/api/v1/leaderboard/playtime",
    ] {
        let (status, body) = get_json(app(dir.path()), route).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn leaderboard_cardinality_matches_players_with_records() {
    let dir = tempfile::tempdir().unwrap();
    write_roster(dir.path(), &[(ANN, "Ann"), (BO, "Bo"), (CY, "Cy")]);
    write_stats(dir.path(), ANN, json!({"minecraft:deaths": 0}));
    write_stats(dir.path(), CY, json!({}));

    let (_, body) = get_json(app(dir.path()), "/api/v1/leaderboard/deaths").await;

    // Two of three players have a stats record; a present-but-empty record
    // counts as zero, never as absent
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["deaths"] == json!(0)));
}

#[tokio::test]
async fn api_descriptor_lists_routes() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = get_json(app(dir.path()), "/api/v1/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api"], "Cobblestats");
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.contains(&json!("/api/v1/leaderboard/deaths")));
    assert!(endpoints.contains(&json!("/api/v1/leaderboard/image.jpg")));
}

#[tokio::test]
async fn snapshot_route_is_404_until_first_publish() {
    let dir = tempfile::tempdir().unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/leaderboard/image.jpg")
        .body(Body::empty())
        .unwrap();
    let response = app(dir.path()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn snapshot_route_serves_published_bytes_as_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = vec![0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10];
    std::fs::write(dir.path().join("leaderboard.jpg"), &bytes).unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/leaderboard/image.jpg")
        .body(Body::empty())
        .unwrap();
    let response = app(dir.path()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/jpeg"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body.as_ref(), bytes.as_slice());
}
