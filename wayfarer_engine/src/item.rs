//! Item catalog entries and the count-based holder trait.

use serde::{Deserialize, Serialize};

use crate::world::ItemId;

/// A collectible or reward item as defined by content.
///
/// Items are pure catalog entries; who holds how many of them is tracked by
/// the holders themselves (player inventory, location ground pools).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
}

/// Methods common to anything that holds stacks of items by id.
///
/// Quantities matter here: quest collect-conditions are satisfied by counts,
/// and the spawn scheduler caps per-location counts, so both the player and
/// locations track `item id -> quantity` rather than mere presence.
pub trait ItemHolder {
    /// Add `quantity` of an item to this holder.
    fn add_items(&mut self, item_id: ItemId, quantity: u32);

    /// Remove up to `quantity` of an item; returns how many were removed.
    fn remove_items(&mut self, item_id: ItemId, quantity: u32) -> u32;

    /// Current count of an item held.
    fn count_of(&self, item_id: ItemId) -> u32;

    fn has_item(&self, item_id: ItemId) -> bool {
        self.count_of(item_id) > 0
    }
}
