//! Rarity and item category classification
//!
//! Both are ordered first-match-wins tables so the precedence is visible in
//! one place.

use serde::{Deserialize, Serialize};

/// Item rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Special,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Uncommon => "UNCOMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
            Rarity::Mythic => "MYTHIC",
            Rarity::Special => "SPECIAL",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    Sword,
    Bow,
    Armor,
    Accessory,
    Consumable,
    #[default]
    Misc,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Sword => "SWORD",
            ItemType::Bow => "BOW",
            ItemType::Armor => "ARMOR",
            ItemType::Accessory => "ACCESSORY",
            ItemType::Consumable => "CONSUMABLE",
            ItemType::Misc => "MISC",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tier text searched in the last lore line, highest first
///
/// `UNCOMMON` is checked after `RARE` and before the default so that the
/// `COMMON` inside it never matters.
const RARITY_RULES: &[(&str, Rarity)] = &[
    ("MYTHIC", Rarity::Mythic),
    ("LEGENDARY", Rarity::Legendary),
    ("EPIC", Rarity::Epic),
    ("RARE", Rarity::Rare),
    ("UNCOMMON", Rarity::Uncommon),
    ("SPECIAL", Rarity::Special),
];

const ARMOR_PIECES: &[&str] = &["HELMET", "CHESTPLATE", "LEGGINGS", "BOOTS"];

/// Input to a type rule: the item id and its raw lore
type TypeRule = (fn(&str, &[&str]) -> bool, ItemType);

/// Id-based rules come before the lore check
const TYPE_RULES: &[TypeRule] = &[
    (is_sword, ItemType::Sword),
    (is_bow, ItemType::Bow),
    (is_armor, ItemType::Armor),
    (is_accessory, ItemType::Accessory),
    (is_consumable, ItemType::Consumable),
];

fn is_sword(id: &str, _: &[&str]) -> bool {
    id.contains("SWORD")
}

fn is_bow(id: &str, _: &[&str]) -> bool {
    id.contains("BOW")
}

fn is_armor(id: &str, _: &[&str]) -> bool {
    ARMOR_PIECES.iter().any(|piece| id.contains(piece))
}

fn is_accessory(_: &str, lore: &[&str]) -> bool {
    lore.iter().any(|line| line.contains("ACCESSORY"))
}

fn is_consumable(id: &str, _: &[&str]) -> bool {
    id.contains("POTION") || id.contains("SCROLL")
}

/// Rarity from the last lore line; `Common` when no tier text is found
pub fn classify_rarity(lines: &[&str]) -> Rarity {
    let last = lines.last().copied().unwrap_or_default();
    RARITY_RULES
        .iter()
        .find(|(text, _)| last.contains(text))
        .map_or(Rarity::Common, |(_, rarity)| *rarity)
}

/// Category from the item id, falling back to lore content
pub fn classify_type(id: &str, lines: &[&str]) -> ItemType {
    TYPE_RULES
        .iter()
        .find(|(matches, _)| matches(id, lines))
        .map_or(ItemType::Misc, |(_, item_type)| *item_type)
}
