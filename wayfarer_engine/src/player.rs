//! Player -- module for the player character in Wayfarer.

use std::collections::{HashMap, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

use crate::item::ItemHolder;
use crate::quest::QuestLog;
use crate::world::{ItemId, LocationId};

/// Experience required per level beyond the first.
pub const EXP_PER_LEVEL: u32 = 100;

/// The player character and everything owned exclusively by them: stacked
/// inventory, gold, experience, the set-once flag set, and the quest log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub location: LocationId,
    pub gold: u32,
    pub experience: u32,
    pub level: u32,
    pub inventory: HashMap<ItemId, u32>,
    /// Named booleans used as long-term memory; set once, never implicitly cleared.
    pub flags: HashSet<String>,
    pub quest_log: QuestLog,
}

impl Default for Player {
    fn default() -> Player {
        Self {
            name: "Wayfarer".into(),
            location: 0,
            gold: 0,
            experience: 0,
            level: 1,
            inventory: HashMap::new(),
            flags: HashSet::new(),
            quest_log: QuestLog::default(),
        }
    }
}

impl Player {
    /// Set a named flag. Setting an already-set flag is a no-op.
    ///
    /// Returns true when the flag was newly set.
    pub fn set_flag(&mut self, name: &str) -> bool {
        let newly_set = self.flags.insert(name.to_string());
        if newly_set {
            info!("player flag set: '{name}'");
        }
        newly_set
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
        info!("player gold +{amount} -> {}", self.gold);
    }

    /// Grant experience and recompute the level.
    ///
    /// Returns true when the grant crossed a level threshold.
    pub fn add_experience(&mut self, amount: u32) -> bool {
        self.experience = self.experience.saturating_add(amount);
        let new_level = level_for_experience(self.experience);
        info!("player experience +{amount} -> {}", self.experience);
        if new_level > self.level {
            info!("player leveled up: {} -> {new_level}", self.level);
            self.level = new_level;
            true
        } else {
            false
        }
    }
}

/// Level reached at a given experience total (linear curve).
pub fn level_for_experience(experience: u32) -> u32 {
    1 + experience / EXP_PER_LEVEL
}

impl ItemHolder for Player {
    fn add_items(&mut self, item_id: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.inventory.entry(item_id).or_insert(0) += quantity;
    }

    fn remove_items(&mut self, item_id: ItemId, quantity: u32) -> u32 {
        let Some(count) = self.inventory.get_mut(&item_id) else {
            return 0;
        };
        let removed = quantity.min(*count);
        *count -= removed;
        if *count == 0 {
            self.inventory.remove(&item_id);
        }
        removed
    }

    fn count_of(&self, item_id: ItemId) -> u32 {
        self.inventory.get(&item_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_flag_is_idempotent() {
        let mut player = Player::default();
        assert!(player.set_flag("met_elder"));
        let flags_after_first = player.flags.clone();
        assert!(!player.set_flag("met_elder"));
        assert_eq!(player.flags, flags_after_first);
        assert!(player.has_flag("met_elder"));
    }

    #[test]
    fn inventory_stacks_by_count() {
        let mut player = Player::default();
        player.add_items(300, 2);
        player.add_items(300, 3);
        assert_eq!(player.count_of(300), 5);
        assert_eq!(player.remove_items(300, 4), 4);
        assert_eq!(player.count_of(300), 1);
    }

    #[test]
    fn experience_grants_level_up_at_threshold() {
        let mut player = Player::default();
        assert!(!player.add_experience(EXP_PER_LEVEL - 1));
        assert_eq!(player.level, 1);
        assert!(player.add_experience(1));
        assert_eq!(player.level, 2);
    }

    #[test]
    fn level_curve_is_linear() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(99), 1);
        assert_eq!(level_for_experience(100), 2);
        assert_eq!(level_for_experience(250), 3);
    }
}
