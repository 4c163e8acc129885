//! # skyblock
//!
//! Hypixel Skyblock item library - tag decoding, lore parsing, inventory records.
//!
//! This library provides functionality to:
//! - Decode the base64/gzip binary tag blobs the profiles API returns
//! - Strip formatting codes from item names and lore
//! - Extract stats, abilities, rarity and category from lore
//! - Turn whole containers into lists of [`ParsedItem`] records
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = "H4sIAAAAAAAAAONiYOBkYMzkYmBgYGBkYGBg..."; // inv_contents.data
//! let inventory = skyblock::parse_inventory_data(blob)?;
//!
//! for item in &inventory.items {
//!     println!("{} [{}] {}", item.id, item.rarity, item.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod ability;
pub mod classify;
pub mod inventory;
pub mod item;
pub mod nbt;
pub mod profile;
pub mod stats;
pub mod text;

mod json;

// Re-export commonly used items
#[doc(inline)]
pub use ability::{parse_ability, ItemAbility, ItemCharges};
#[doc(inline)]
pub use classify::{classify_rarity, classify_type, ItemType, Rarity};
#[doc(inline)]
pub use inventory::{parse_inventory, parse_inventory_data, parse_slots, Inventory, InventoryError};
#[doc(inline)]
pub use item::{parse_item, ItemFlags, ParsedItem};
#[doc(inline)]
pub use nbt::{decode_base64_tag, decode_inventory_data, NbtError, Tag};
#[doc(inline)]
pub use profile::{resolve_profile, InventoryKind, Member, ProfilesResponse, ResolvedProfile};
#[doc(inline)]
pub use stats::{parse_stats, ItemStat, StatMap};
#[doc(inline)]
pub use text::{clean, extract_number};
