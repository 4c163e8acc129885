//! Stat lines from item lore
//!
//! Stats appear as `Damage: +120`, optionally followed by bracketed bonuses.
//! Only the dark gray one (`§8(+30)`) is the dungeon variant; yellow and blue
//! brackets are reforge and gemstone bonuses and are ignored. Gear Score has
//! its own layout and is matched anywhere in the lore.

use crate::text::{clean, parse_amount};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stat key -> lore line prefix, in lookup order
pub const STAT_PREFIXES: &[(&str, &str)] = &[
    ("damage", "Damage: "),
    ("strength", "Strength: "),
    ("critChance", "Crit Chance: "),
    ("critDamage", "Crit Damage: "),
    ("intelligence", "Intelligence: "),
    ("health", "Health: "),
    ("defense", "Defense: "),
    ("speed", "Speed: "),
    ("attackSpeed", "Bonus Attack Speed: "),
    ("seaCreatureChance", "Sea Creature Chance: "),
    ("miningSpeed", "Mining Speed: "),
    ("ferocity", "Ferocity: "),
    ("fishingSpeed", "Fishing Speed: "),
];

/// Key used for the Gear Score entry
pub const GEAR_SCORE_KEY: &str = "gearScore";

static STAT_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?[\d,]+(?:\.\d+)?)").expect("stat amount pattern"));

/// Dungeon bonus, matched on the raw line where its color code survives
static DUNGEON_BONUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"§8\(\+?([\d,]+(?:\.\d+)?)%?\)").expect("dungeon bonus pattern")
});

static GEAR_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Gear Score: ([\d,]+)(?:\s*\(([\d,]+)\))?").expect("gear score pattern")
});

/// A stat value, with the dungeon variant when the lore shows one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    #[serde(serialize_with = "crate::json::number")]
    pub regular: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::json::optional_number"
    )]
    pub dungeon: Option<f64>,
}

/// Stats keyed by name (`damage`, `critChance`, `gearScore`, ...)
pub type StatMap = BTreeMap<String, ItemStat>;

/// Extract stats from raw lore lines
///
/// Returns `None` when no line matched, so callers can tell "no stats"
/// apart from an empty map.
///
/// Unlike Hypixel's own `+<amount>` layout, a leading `-` is kept, so
/// `Speed: -3` reads as `-3` rather than `3`.
pub fn parse_stats(lines: &[&str]) -> Option<StatMap> {
    let cleaned: Vec<String> = lines.iter().map(|line| clean(line)).collect();
    let mut stats = StatMap::new();

    for (key, prefix) in STAT_PREFIXES {
        let amount = lines
            .iter()
            .zip(&cleaned)
            .find(|(_, line)| line.starts_with(prefix))
            .and_then(|(raw, line)| prefixed_stat(raw, &line[prefix.len()..]));
        if let Some(stat) = amount {
            stats.insert((*key).to_string(), stat);
        }
    }

    let gear_score = cleaned
        .iter()
        .find(|line| line.contains("Gear Score:"))
        .and_then(|line| capture_stat(&GEAR_SCORE, line));
    if let Some(stat) = gear_score {
        stats.insert(GEAR_SCORE_KEY.to_string(), stat);
    }

    (!stats.is_empty()).then_some(stats)
}

/// Base amount from the cleaned text after the prefix, dungeon bonus from the raw line
fn prefixed_stat(raw: &str, amount: &str) -> Option<ItemStat> {
    let regular = parse_amount(STAT_AMOUNT.captures(amount)?.get(1)?.as_str())?;
    let dungeon = DUNGEON_BONUS
        .captures(raw)
        .and_then(|caps| parse_amount(caps.get(1)?.as_str()));
    Some(ItemStat { regular, dungeon })
}

fn capture_stat(pattern: &Regex, text: &str) -> Option<ItemStat> {
    let caps = pattern.captures(text)?;
    let regular = parse_amount(caps.get(1)?.as_str())?;
    let dungeon = caps.get(2).and_then(|m| parse_amount(m.as_str()));
    Some(ItemStat { regular, dungeon })
}
