//! Parsed Skyblock items
//!
//! [`parse_item`] turns one slot of a decoded inventory into a [`ParsedItem`].
//! The slot layout Hypixel uses:
//!
//! ```text
//! { id, Count, Damage,
//!   tag: { Unbreakable,
//!          display: { Name, Lore: [..] },
//!          ExtraAttributes: { id, uuid, timestamp, modifier, originTag,
//!                             hot_potato_count, runes: { NAME: level }, enchantments } } }
//! ```

use crate::ability::{parse_ability, ItemAbility};
use crate::classify::{classify_rarity, classify_type, ItemType, Rarity};
use crate::nbt::Tag;
use crate::stats::{parse_stats, StatMap};
use crate::text::clean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name used when the display section has no `Name`
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// Glyph Hypixel prefixes to the names of starred dungeon items
pub const STAR_GLYPH: char = '✪';

/// Boolean and counter attributes of an item
#[allow(clippy::struct_excessive_bools)] // Mirrors the flags object clients consume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFlags {
    pub is_unbreakable: bool,
    pub is_dungeon_item: bool,
    pub is_coop_soulbound: bool,
    pub is_starred: bool,
    pub has_hot_potato_books: i64,
}

/// A structured item record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatMap>,
    pub flags: ItemFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<ItemAbility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runes: Option<BTreeMap<String, i64>>,
}

/// Parse one inventory slot
///
/// Returns `None` for slots without an `ExtraAttributes.id` or without
/// display lore. Such slots are empty or not visible through the API and are
/// skipped rather than reported.
pub fn parse_item(slot: &Tag) -> Option<ParsedItem> {
    let tag = slot.get("tag")?;
    let extra = tag.get("ExtraAttributes");
    let display = tag.get("display")?;
    let lore = display.get("Lore")?.string_list()?;

    let id = extra
        .and_then(|e| e.get("id"))
        .and_then(Tag::as_str)
        .filter(|id| !id.is_empty())?;
    let raw_name = display.get("Name").and_then(Tag::as_str);

    let flags = ItemFlags {
        is_unbreakable: tag.get("Unbreakable").is_some_and(Tag::is_truthy),
        is_dungeon_item: id.contains("DUNGEON") || lore.iter().any(|l| l.contains("DUNGEON")),
        is_coop_soulbound: lore.iter().any(|l| l.contains("Co-op Soulbound")),
        is_starred: raw_name.is_some_and(|name| name.contains(STAR_GLYPH)),
        has_hot_potato_books: extra
            .and_then(|e| e.get("hot_potato_count"))
            .and_then(Tag::as_i64)
            .unwrap_or(0),
    };

    let modifier = extra
        .and_then(|e| e.get("modifier"))
        .and_then(Tag::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let runes: Option<BTreeMap<String, i64>> = extra
        .and_then(|e| e.get("runes"))
        .and_then(Tag::as_compound)
        .map(|runes| {
            runes
                .iter()
                .filter_map(|(name, level)| Some((name.clone(), level.as_i64()?)))
                .collect()
        });

    Some(ParsedItem {
        id: id.to_string(),
        name: clean(raw_name.unwrap_or(UNKNOWN_ITEM_NAME)),
        description: clean(&lore.join("\n")),
        rarity: classify_rarity(&lore),
        item_type: classify_type(id, &lore),
        count: slot.get("Count").and_then(Tag::as_i64).unwrap_or(1),
        stats: parse_stats(&lore),
        flags,
        ability: parse_ability(&lore),
        modifier,
        runes,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::nbt::fixture;
    use crate::stats::ItemStat;

    /// A fully populated slot as Hypixel sends it
    pub(crate) fn hyperion_slot() -> Tag {
        Tag::compound([
            ("id", Tag::Short(267)),
            ("Count", Tag::Byte(1)),
            ("Damage", Tag::Short(0)),
            (
                "tag",
                Tag::compound([
                    ("Unbreakable", Tag::Byte(1)),
                    ("HideFlags", Tag::Int(254)),
                    (
                        "display",
                        Tag::compound([
                            ("Name", Tag::from("§dHeroic Hyperion §6✪✪✪✪✪")),
                            (
                                "Lore",
                                fixture::lore(&[
                                    "§7Gear Score: §d1046 §8(4,129)",
                                    "§7Damage: §c+292 §8(+1,241)",
                                    "§7Strength: §c+200 §e(+50) §8(+850)",
                                    "§7Intelligence: §a+652 §9(+50) §8(+2,771)",
                                    "",
                                    "§6Ability: Wither Impact  §e§lRIGHT CLICK",
                                    "§7Teleports §a10 blocks §7ahead of you.",
                                    "§8Mana Cost: §3150",
                                    "§8Cooldown: §a0.1s",
                                    "",
                                    "§8§l* §8Co-op Soulbound §8§l*",
                                    "§d§l§ka§r §d§l§dMYTHIC DUNGEON SWORD §d§l§ka",
                                ]),
                            ),
                        ]),
                    ),
                    (
                        "ExtraAttributes",
                        Tag::compound([
                            ("id", Tag::from("HYPERION")),
                            ("uuid", Tag::from("4c3cdd2a-0000-0000-0000-000000000000")),
                            ("modifier", Tag::from("heroic")),
                            ("hot_potato_count", Tag::Int(15)),
                            ("timestamp", Tag::LongArray(vec![1_650_000_000_000])),
                            (
                                "runes",
                                Tag::compound([
                                    ("MUSIC", Tag::Int(3)),
                                    ("BROKEN", Tag::from("nope")),
                                ]),
                            ),
                        ]),
                    ),
                ]),
            ),
        ])
    }

    pub(crate) fn plain_slot(id: &str, lore: &[&str]) -> Tag {
        Tag::compound([(
            "tag",
            Tag::compound([
                ("display", Tag::compound([("Lore", fixture::lore(lore))])),
                ("ExtraAttributes", Tag::compound([("id", Tag::from(id))])),
            ]),
        )])
    }

    #[test]
    fn test_full_item() {
        let item = parse_item(&hyperion_slot()).unwrap();

        assert_eq!(item.id, "HYPERION");
        assert_eq!(item.name, "Heroic Hyperion ✪✪✪✪✪");
        assert_eq!(item.rarity, Rarity::Mythic);
        assert_eq!(item.item_type, ItemType::Misc);
        assert_eq!(item.count, 1);
        assert_eq!(item.modifier.as_deref(), Some("heroic"));
        assert_eq!(
            item.flags,
            ItemFlags {
                is_unbreakable: true,
                is_dungeon_item: true,
                is_coop_soulbound: true,
                is_starred: true,
                has_hot_potato_books: 15,
            }
        );

        let stats = item.stats.unwrap();
        assert_eq!(
            stats["damage"],
            ItemStat {
                regular: 292.0,
                dungeon: Some(1241.0)
            }
        );
        assert_eq!(
            stats["gearScore"],
            ItemStat {
                regular: 1046.0,
                dungeon: Some(4129.0)
            }
        );
        assert_eq!(
            stats["strength"],
            ItemStat {
                regular: 200.0,
                dungeon: Some(850.0)
            }
        );
        assert_eq!(
            stats["intelligence"],
            ItemStat {
                regular: 652.0,
                dungeon: Some(2771.0)
            }
        );

        let ability = item.ability.unwrap();
        assert_eq!(ability.name, "Wither Impact");
        assert_eq!(ability.mana_cost, Some(150.0));
        assert_eq!(ability.cooldown.as_deref(), Some("0.1s"));

        let runes = item.runes.unwrap();
        assert_eq!(runes.len(), 1);
        assert_eq!(runes["MUSIC"], 3);
    }

    #[test]
    fn test_description_is_cleaned_lore() {
        let slot = plain_slot("ROCK", &["§7A §lshiny§r rock.", "§f§lCOMMON"]);
        let item = parse_item(&slot).unwrap();
        assert_eq!(item.description, "A shiny rock.\nCOMMON");
    }

    #[test]
    fn test_defaults() {
        let item = parse_item(&plain_slot("ROCK", &["§7Just a rock."])).unwrap();
        assert_eq!(item.name, UNKNOWN_ITEM_NAME);
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(item.item_type, ItemType::Misc);
        assert_eq!(item.count, 1);
        assert_eq!(item.flags, ItemFlags::default());
        assert!(item.stats.is_none());
        assert!(item.ability.is_none());
        assert!(item.modifier.is_none());
        assert!(item.runes.is_none());
    }

    #[test]
    fn test_missing_id_is_dropped() {
        let slot = Tag::compound([(
            "tag",
            Tag::compound([(
                "display",
                Tag::compound([("Lore", fixture::lore(&["§6§lLEGENDARY"]))]),
            )]),
        )]);
        assert!(parse_item(&slot).is_none());
        assert!(parse_item(&plain_slot("", &["§6§lLEGENDARY"])).is_none());
    }

    #[test]
    fn test_missing_lore_is_dropped() {
        let slot = Tag::compound([(
            "tag",
            Tag::compound([
                ("display", Tag::compound([("Name", Tag::from("§aThing"))])),
                ("ExtraAttributes", Tag::compound([("id", Tag::from("THING"))])),
            ]),
        )]);
        assert!(parse_item(&slot).is_none());
        assert!(parse_item(&Tag::compound(Vec::<(String, Tag)>::new())).is_none());
    }

    #[test]
    fn test_wrong_shapes_are_absent() {
        let slot = Tag::compound([
            ("Count", Tag::from("lots")),
            (
                "tag",
                Tag::compound([
                    ("Unbreakable", Tag::from("")),
                    ("display", Tag::compound([("Lore", fixture::lore(&["x"]))])),
                    (
                        "ExtraAttributes",
                        Tag::compound([
                            ("id", Tag::from("STICK")),
                            ("modifier", Tag::Int(4)),
                            ("runes", Tag::Int(1)),
                        ]),
                    ),
                ]),
            ),
        ]);
        let item = parse_item(&slot).unwrap();
        assert_eq!(item.count, 1);
        assert!(!item.flags.is_unbreakable);
        assert!(item.modifier.is_none());
        assert!(item.runes.is_none());
    }

    #[test]
    fn test_parse_is_repeatable() {
        let slot = hyperion_slot();
        assert_eq!(parse_item(&slot), parse_item(&slot));
    }

    #[test]
    fn test_serialized_shape() {
        let item = parse_item(&plain_slot(
            "ASPECT_OF_THE_END",
            &["§7Damage: §c+100", "§9§lRARE SWORD"],
        ))
        .unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "ASPECT_OF_THE_END",
                "name": "Unknown Item",
                "description": "Damage: +100\nRARE SWORD",
                "rarity": "RARE",
                "type": "MISC",
                "count": 1,
                "stats": { "damage": { "regular": 100 } },
                "flags": {
                    "isUnbreakable": false,
                    "isDungeonItem": false,
                    "isCoopSoulbound": false,
                    "isStarred": false,
                    "hasHotPotatoBooks": 0
                }
            })
        );

        let back: ParsedItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
