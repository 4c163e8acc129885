//! Inventory pipeline
//!
//! Maps every slot of a decoded container through [`parse_item`]. Empty and
//! malformed slots are dropped; only a payload that is not a slot list at
//! all fails the call.

use crate::item::{parse_item, ParsedItem};
use crate::nbt::{self, NbtError, Tag};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Errors for a whole inventory payload
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Invalid tag data: {0}")]
    Decode(#[from] NbtError),

    #[error("Inventory payload is not a slot list (tag id {0})")]
    NotAList(u8),
}

/// Parsed container contents, serialized as `{ "items": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<ParsedItem>,
    /// Slots that were empty or did not parse
    #[serde(skip)]
    pub dropped: usize,
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse slots where `None` marks an empty slot
///
/// Slots are parsed in parallel; surviving items keep their input order.
pub fn parse_slots(slots: &[Option<Tag>]) -> Inventory {
    let items: Vec<ParsedItem> = slots
        .par_iter()
        .filter_map(|slot| slot.as_ref().and_then(parse_item))
        .collect();
    let dropped = slots.len() - items.len();
    Inventory { items, dropped }
}

/// Parse a decoded slot list
///
/// Any non-compound element counts as an empty slot.
pub fn parse_inventory(slots: &Tag) -> Result<Inventory, InventoryError> {
    let slots = slots
        .as_list()
        .ok_or_else(|| InventoryError::NotAList(slots.type_id()))?;
    let items: Vec<ParsedItem> = slots
        .par_iter()
        .filter(|slot| slot.as_compound().is_some())
        .filter_map(parse_item)
        .collect();
    let dropped = slots.len() - items.len();
    Ok(Inventory { items, dropped })
}

/// Decode a base64 container blob and parse its slots
pub fn parse_inventory_data(encoded: &str) -> Result<Inventory, InventoryError> {
    let slots = nbt::decode_inventory_data(encoded)?;
    parse_inventory(&slots)
}
