//! Item ability blocks
//!
//! An ability starts at the first line containing `Ability: ` and runs until
//! a blank line. Lines in between are either one of the keyed entries (mana
//! cost, cooldown, soulflow cost, charges) or description prose.

use crate::text::{clean, extract_number, FORMAT_MARKER};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const ABILITY_MARKER: &str = "Ability: ";

/// Trigger phrases removed from the ability name
const TRIGGER_PHRASES: &[&str] = &["RIGHT CLICK", "LEFT CLICK", "HOLD"];

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("integer pattern"));

/// Charge counter for abilities with multiple uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCharges {
    pub current: u32,
    pub maximum: u32,
    pub recharge_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAbility {
    pub name: String,
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::json::optional_number"
    )]
    pub mana_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::json::optional_number"
    )]
    pub soulflow_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<ItemCharges>,
}

/// What a single line inside an ability block means
#[derive(Debug, Clone, PartialEq)]
enum AbilityLine {
    ManaCost(f64),
    Cooldown(Option<String>),
    SoulflowCost(f64),
    Charges(Option<ItemCharges>),
    Prose(String),
    End,
}

type LineRule = (&'static str, fn(&str) -> AbilityLine);

/// Keyed lines, checked in order; the first key found in a line decides it
const LINE_RULES: &[LineRule] = &[
    ("Mana Cost:", mana_cost_line),
    ("Cooldown:", cooldown_line),
    ("Soulflow Cost:", soulflow_cost_line),
    ("Charges:", charges_line),
];

fn mana_cost_line(line: &str) -> AbilityLine {
    AbilityLine::ManaCost(extract_number(line))
}

/// Cooldown text is kept verbatim (`5s`, `1m 30s`)
fn cooldown_line(line: &str) -> AbilityLine {
    AbilityLine::Cooldown(
        line.split_once("Cooldown: ")
            .map(|(_, rest)| rest.to_string()),
    )
}

fn soulflow_cost_line(line: &str) -> AbilityLine {
    AbilityLine::SoulflowCost(extract_number(line))
}

fn charges_line(line: &str) -> AbilityLine {
    AbilityLine::Charges(parse_charges(line))
}

fn classify_line(line: &str) -> AbilityLine {
    if let Some((_, rule)) = LINE_RULES.iter().find(|(key, _)| line.contains(key)) {
        return rule(line);
    }
    if line.is_empty() || line.starts_with(FORMAT_MARKER) {
        AbilityLine::End
    } else {
        AbilityLine::Prose(line.to_string())
    }
}

/// First two integers on the line are current and maximum charges
///
/// The recharge time is not printed on the line; it is reported as the
/// maximum in seconds.
fn parse_charges(line: &str) -> Option<ItemCharges> {
    let mut numbers = INTEGER.find_iter(line).filter_map(|m| m.as_str().parse().ok());
    let current = numbers.next()?;
    let maximum = numbers.next()?;
    Some(ItemCharges {
        current,
        maximum,
        recharge_time: format!("{maximum}s"),
    })
}

fn ability_name(header: &str) -> String {
    let raw = header
        .split_once(ABILITY_MARKER)
        .map_or("", |(_, rest)| rest);
    TRIGGER_PHRASES
        .iter()
        .fold(raw.to_string(), |name, phrase| name.replace(phrase, ""))
        .trim()
        .to_string()
}

/// Extract the first ability block from raw lore lines
pub fn parse_ability(lines: &[&str]) -> Option<ItemAbility> {
    let cleaned: Vec<String> = lines.iter().map(|line| clean(line)).collect();
    let start = cleaned
        .iter()
        .position(|line| line.contains(ABILITY_MARKER))?;

    let mut ability = ItemAbility {
        name: ability_name(&cleaned[start]),
        description: String::new(),
        mana_cost: None,
        cooldown: None,
        soulflow_cost: None,
        charges: None,
    };
    let mut description = Vec::new();

    for line in &cleaned[start + 1..] {
        match classify_line(line) {
            AbilityLine::ManaCost(cost) => ability.mana_cost = Some(cost),
            AbilityLine::Cooldown(cooldown) => {
                if cooldown.is_some() {
                    ability.cooldown = cooldown;
                }
            }
            AbilityLine::SoulflowCost(cost) => ability.soulflow_cost = Some(cost),
            AbilityLine::Charges(charges) => {
                if charges.is_some() {
                    ability.charges = charges;
                }
            }
            AbilityLine::Prose(text) => description.push(text),
            AbilityLine::End => break,
        }
    }

    ability.description = description.join(" ");
    Some(ability)
}
