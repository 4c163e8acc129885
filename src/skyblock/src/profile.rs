//! Skyblock profile responses
//!
//! Only the parts of the `/v2/skyblock/profiles` response the inventory
//! endpoints need are modeled. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level profiles response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// `null` when the player has never played Skyblock
    #[serde(default)]
    pub profiles: Option<Vec<Profile>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,
    #[serde(default)]
    pub members: HashMap<String, Member>,
}

/// One player's data within a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryContents>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inv_contents: Option<InventoryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ender_chest_contents: Option<InventoryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_contents: Option<BagContents>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BagContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talisman_bag: Option<InventoryData>,
}

/// A base64 encoded container blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    pub data: String,
}

/// A profile together with the requesting player's member entry
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProfile<'a> {
    pub profile: &'a Profile,
    pub member: &'a Member,
}

/// Find `profile_id` in the response and the player's entry in it
///
/// Member keys are undashed UUIDs, so dashes in `player` are ignored.
pub fn resolve_profile<'a>(
    response: &'a ProfilesResponse,
    player: &str,
    profile_id: &str,
) -> Option<ResolvedProfile<'a>> {
    let profile = response
        .profiles
        .as_deref()?
        .iter()
        .find(|p| p.profile_id == profile_id)?;
    let member = profile.members.get(&player.replace('-', ""))?;
    Some(ResolvedProfile { profile, member })
}

impl Member {
    /// Serialize for the profile cache
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(snapshot)
    }
}

/// Which container of a member to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryKind {
    Inventory,
    EnderChest,
    AccessoryBag,
}

impl InventoryKind {
    /// The base64 blob for this container, if the API exposes it
    pub fn data<'a>(&self, member: &'a Member) -> Option<&'a str> {
        let contents = member.inventory.as_ref()?;
        let container = match self {
            InventoryKind::Inventory => contents.inv_contents.as_ref(),
            InventoryKind::EnderChest => contents.ender_chest_contents.as_ref(),
            InventoryKind::AccessoryBag => contents.bag_contents.as_ref()?.talisman_bag.as_ref(),
        }?;
        Some(container.data.as_str()).filter(|data| !data.is_empty())
    }

    /// Message used when the container is missing
    pub fn not_found_message(&self) -> &'static str {
        match self {
            InventoryKind::Inventory => "Cannot find inventory data",
            InventoryKind::EnderChest => "Cannot find ender chest data",
            InventoryKind::AccessoryBag => "Cannot find accessory bag data",
        }
    }
}
