//! Pure metric extraction over parsed player records.
//!
//! Most records are partial. Every lookup defaults at every level, so a
//! record missing a whole sub-tree reads the same as one whose counters are
//! all zero. None of these functions can fail.

use std::collections::HashMap;

use fastnbt::Value as Nbt;
use serde_json::Value as Json;

const TICKS_PER_MINUTE: i64 = 20 * 60;
const CM_PER_METER: i64 = 100;

/// The eight distance sub-counters of the vanilla stat block, all in
/// centimeters.
const DISTANCE_STATS: [&str; 8] = [
    "minecraft:walk_one_cm",
    "minecraft:sprint_one_cm",
    "minecraft:crouch_one_cm",
    "minecraft:swim_one_cm",
    "minecraft:fall_one_cm",
    "minecraft:climb_one_cm",
    "minecraft:fly_one_cm",
    "minecraft:walk_on_water_one_cm",
];

/// Creature boxes come in two families of fifty, keyed by positional index.
const BOX_FAMILIES: [&str; 2] = ["Box", "BackupBox"];
const BOXES_PER_FAMILY: usize = 50;

/// Walk a chain of JSON object keys, yielding `None` as soon as any level is
/// missing.
fn nested<'a>(value: &'a Json, path: &[&str]) -> Option<&'a Json> {
    path.iter().try_fold(value, |value, key| value.get(key))
}

/// One counter out of the vanilla `minecraft:custom` stat block, 0 when
/// absent at any level.
fn custom_stat(stats: &Json, key: &str) -> i64 {
    nested(stats, &["stats", "minecraft:custom", key])
        .and_then(Json::as_i64)
        .unwrap_or(0)
}

/// Play time in whole minutes. Ticks run at 20 per second; the division
/// truncates.
pub fn play_time_minutes(stats: &Json) -> i64 {
    custom_stat(stats, "minecraft:play_time") / TICKS_PER_MINUTE
}

pub fn sneak_time_minutes(stats: &Json) -> i64 {
    custom_stat(stats, "minecraft:sneak_time") / TICKS_PER_MINUTE
}

pub fn deaths(stats: &Json) -> i64 {
    custom_stat(stats, "minecraft:deaths")
}

/// Total distance traveled in whole meters, summed over the eight
/// sub-counters before the centimeter division.
pub fn distance_traveled_meters(stats: &Json) -> i64 {
    DISTANCE_STATS
        .iter()
        .map(|key| custom_stat(stats, key))
        .sum::<i64>()
        / CM_PER_METER
}

pub fn loot_balls_opened(stats: &Json) -> i64 {
    custom_stat(stats, "cobblemon:loot_balls_opened")
}

pub fn lootr_chests_opened(stats: &Json) -> i64 {
    custom_stat(stats, "lootr:chests_opened")
}

/// Number of distinct species in the capture ledger.
pub fn pokemon_caught(cobblemon: &Json) -> i64 {
    nested(cobblemon, &["extraData", "captureCount", "defeats"])
        .and_then(Json::as_object)
        .map_or(0, |ledger| ledger.len() as i64)
}

/// Number of entries in the discovery registry, optionally restricted to the
/// ones flagged shiny.
pub fn pokedex_discovered(cobblemon: &Json, shiny_only: bool) -> i64 {
    let registers = match nested(cobblemon, &["extraData", "cobbledex_discovery", "registers"])
        .and_then(Json::as_object)
    {
        Some(registers) => registers,
        None => return 0,
    };

    if !shiny_only {
        return registers.len() as i64;
    }

    registers
        .values()
        .filter(|entry| {
            nested(entry, &["normal", "isShiny"])
                .and_then(Json::as_bool)
                .unwrap_or(false)
        })
        .count() as i64
}

fn nbt_compound(value: &Nbt) -> Option<&HashMap<String, Nbt>> {
    match value {
        Nbt::Compound(compound) => Some(compound),
        _ => None,
    }
}

fn nbt_integer(value: &Nbt) -> i64 {
    match value {
        Nbt::Byte(v) => *v as i64,
        Nbt::Short(v) => *v as i64,
        Nbt::Int(v) => *v as i64,
        Nbt::Long(v) => *v,
        _ => 0,
    }
}

/// Currency balance from the storage archive, 0 when the field is absent.
pub fn money_balance(storage: &Nbt) -> i64 {
    nbt_compound(storage)
        .and_then(|root| root.get("Money"))
        .map_or(0, nbt_integer)
}

/// Total creatures owned: the occupied-slot counts of every present box
/// across both box families. An absent box contributes nothing.
pub fn pokemon_count(storage: &Nbt) -> i64 {
    let root = match nbt_compound(storage) {
        Some(root) => root,
        None => return 0,
    };

    let mut total = 0;
    for family in BOX_FAMILIES {
        for index in 0..BOXES_PER_FAMILY {
            if let Some(slots) = root
                .get(&format!("{family}{index}"))
                .and_then(nbt_compound)
            {
                total += slots.len() as i64;
            }
        }
    }
    total
}
