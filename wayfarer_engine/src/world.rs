//! Data structures representing the game world.
//!
//! This module defines [`WayfarerWorld`] and related helpers used at runtime
//! to track the current state of the game. The world is an explicit context
//! object: every evaluate/apply/resolve call receives it rather than reaching
//! for globals.

use crate::WAYFARER_VERSION;
use crate::dialogue::DialogueDoc;
use crate::item::Item;
use crate::location::Location;
use crate::monster::Monster;
use crate::npc::Npc;
use crate::player::Player;
use crate::quest::Quest;

use anyhow::{Result, anyhow};
use log::info;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

pub use wayfarer_data::{DialogueId, EntityId, ItemId, LocationId, MonsterId, NodeId, NpcId, QuestId};

/// Complete state of the running game.
///
/// `WayfarerWorld` contains the content catalogs (locations, items, monsters,
/// NPCs, dialogues, quests) plus the player and turn counter. Catalogs are
/// loaded once and treated as immutable content; per-player progress lives in
/// the player's quest log and flag set. The whole world serializes as one
/// save snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayfarerWorld {
    pub game_title: String,
    pub world_slug: String,
    pub intro: String,
    pub locations: HashMap<LocationId, Location>,
    pub items: HashMap<ItemId, Item>,
    pub monsters: HashMap<MonsterId, Monster>,
    pub npcs: HashMap<NpcId, Npc>,
    pub dialogues: HashMap<DialogueId, DialogueDoc>,
    pub quests: HashMap<QuestId, Quest>,
    pub player: Player,
    pub turn_count: usize,
    pub version: String,
}

impl WayfarerWorld {
    /// Create a new empty world with a default player.
    pub fn new_empty() -> WayfarerWorld {
        let world = Self {
            version: WAYFARER_VERSION.to_string(),
            ..Self::default()
        };
        info!("new, empty 'WayfarerWorld' created");
        world
    }

    /// Obtain a reference to the location the player occupies.
    ///
    /// # Errors
    /// - if the player's location id is not found in the world
    pub fn player_location_ref(&self) -> Result<&Location> {
        self.locations
            .get(&self.player.location)
            .ok_or_else(|| anyhow!("player's location id ({}) not found in world", self.player.location))
    }

    /// Obtain a mutable reference to the location the player occupies.
    ///
    /// # Errors
    /// - if the player's location id is not found in the world
    pub fn player_location_mut(&mut self) -> Result<&mut Location> {
        self.locations
            .get_mut(&self.player.location)
            .ok_or_else(|| anyhow!("player's location id ({}) not found in world", self.player.location))
    }

    /// Look up a quest definition by id.
    ///
    /// # Errors
    /// - if no quest with that id exists in the catalog
    pub fn quest_ref(&self, quest_id: QuestId) -> Result<&Quest> {
        self.quests
            .get(&quest_id)
            .ok_or_else(|| anyhow!("quest id ({quest_id}) not found in world"))
    }

    /// Look up an NPC by id.
    ///
    /// # Errors
    /// - if no NPC with that id exists
    pub fn npc_ref(&self, npc_id: NpcId) -> Result<&Npc> {
        self.npcs
            .get(&npc_id)
            .ok_or_else(|| anyhow!("npc id ({npc_id}) not found in world"))
    }

    /// Look up the dialogue document attached to an NPC.
    ///
    /// # Errors
    /// - if the NPC or its dialogue document is missing
    pub fn npc_dialogue_ref(&self, npc_id: NpcId) -> Result<&DialogueDoc> {
        let npc = self.npc_ref(npc_id)?;
        self.dialogues
            .get(&npc.dialogue_id)
            .ok_or_else(|| anyhow!("dialogue '{}' for npc {npc_id} not found in world", npc.dialogue_id))
    }

    /// Display name of an item, or a placeholder for a bad id.
    pub fn item_name(&self, item_id: ItemId) -> &str {
        self.items.get(&item_id).map_or("<unknown item>", |item| item.name.as_str())
    }

    /// Display name of a quest, or a placeholder for a bad id.
    pub fn quest_name(&self, quest_id: QuestId) -> &str {
        self.quests
            .get(&quest_id)
            .map_or("<unknown quest>", |quest| quest.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn create_test_location(id: LocationId) -> Location {
        Location {
            id,
            name: format!("Location {id}"),
            description: "A test location".into(),
            exits: Vec::new(),
            npcs: std::collections::HashSet::new(),
            monsters: std::collections::HashSet::new(),
            ground_items: HashMap::new(),
            visited: false,
        }
    }

    #[test]
    fn new_empty_creates_valid_world() {
        let world = WayfarerWorld::new_empty();
        assert!(world.locations.is_empty());
        assert!(world.quests.is_empty());
        assert!(world.dialogues.is_empty());
        assert_eq!(world.turn_count, 0);
        assert_eq!(world.version, crate::WAYFARER_VERSION);
    }

    #[test]
    fn player_location_ref_works() {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(7, create_test_location(7));
        world.player.location = 7;
        assert_eq!(world.player_location_ref().unwrap().id, 7);
    }

    #[test]
    fn player_location_ref_errors_when_location_missing() {
        let mut world = WayfarerWorld::new_empty();
        world.player.location = 404;
        assert!(world.player_location_ref().is_err());
    }

    #[test]
    fn player_location_mut_works() {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(7, create_test_location(7));
        world.player.location = 7;
        world.player_location_mut().unwrap().visited = true;
        assert!(world.locations.get(&7).unwrap().visited);
    }

    #[test]
    fn quest_ref_errors_on_unknown_id() {
        let world = WayfarerWorld::new_empty();
        assert!(world.quest_ref(5001).is_err());
    }

    #[test]
    fn item_name_falls_back_for_bad_id() {
        let world = WayfarerWorld::new_empty();
        assert_eq!(world.item_name(9), "<unknown item>");
    }
}
