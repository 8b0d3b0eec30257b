//! Locations -- the places the player moves between.
//!
//! A location is a collaborator from the quest engine's point of view: it
//! receives spawn/despawn requests for collectibles and answers count
//! queries. It owns no pickup or rendering logic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::item::ItemHolder;
use crate::world::{ItemId, LocationId, MonsterId, NpcId};

/// One place in the world, with its residents and collectible ground pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub description: String,
    pub exits: Vec<LocationId>,
    pub npcs: HashSet<NpcId>,
    pub monsters: HashSet<MonsterId>,
    /// Collectibles lying here, spawned by the scheduler or dropped by the player.
    pub ground_items: HashMap<ItemId, u32>,
    pub visited: bool,
}

impl ItemHolder for Location {
    fn add_items(&mut self, item_id: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.ground_items.entry(item_id).or_insert(0) += quantity;
    }

    fn remove_items(&mut self, item_id: ItemId, quantity: u32) -> u32 {
        let Some(count) = self.ground_items.get_mut(&item_id) else {
            return 0;
        };
        let removed = quantity.min(*count);
        *count -= removed;
        if *count == 0 {
            self.ground_items.remove(&item_id);
        }
        removed
    }

    fn count_of(&self, item_id: ItemId) -> u32 {
        self.ground_items.get(&item_id).copied().unwrap_or(0)
    }
}
