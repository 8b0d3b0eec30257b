//! Collectible spawn scheduler.
//!
//! Each collect-condition can carry spawn data describing where its items
//! materialize. Two triggers populate the world: a one-shot seeding the first
//! time the player reaches a relevant location after activation, and an
//! interval roll every `interval` turns per configured location. Both are
//! driven by game turns, never by wall-clock time, and both respect the
//! per-location cap. Completing the quest clears whatever is still lying
//! around.

use log::info;
use rand::Rng;

use crate::item::ItemHolder;
use crate::quest::{Quest, QuestCondition, SpawnData};
use crate::world::{ItemId, LocationId, QuestId, WayfarerWorld};

/// One-shot spawn when the player arrives somewhere relevant.
///
/// The first time a location tied to an in-flight quest's unspawned
/// collectibles is entered, every configured location for that quest is
/// seeded at once and the quest's `items_spawned` guard is set. Later visits
/// change nothing; the interval roll handles replenishment.
pub fn on_visit(world: &mut WayfarerWorld, location_id: LocationId) {
    let to_seed: Vec<QuestId> = world
        .player
        .quest_log
        .entries
        .iter()
        .filter(|(_, progress)| {
            (progress.state.is_active() || progress.state.is_ready_to_complete()) && !progress.items_spawned
        })
        .filter(|(quest_id, _)| {
            world.quests.get(*quest_id).is_some_and(|quest| {
                spawn_specs(quest).any(|(_, spawn)| spawn.location == location_id)
            })
        })
        .map(|(quest_id, _)| *quest_id)
        .collect();

    for quest_id in to_seed {
        let Some(quest) = world.quests.get(&quest_id) else {
            continue;
        };
        let specs: Vec<(ItemId, SpawnData)> = spawn_specs(quest).map(|(item, spawn)| (item, spawn.clone())).collect();
        for (item_id, spawn) in specs {
            place_capped(world, item_id, &spawn);
        }
        if let Some(progress) = world.player.quest_log.entries.get_mut(&quest_id) {
            progress.items_spawned = true;
        }
        info!("quest {quest_id}: collectibles seeded on first visit to location {location_id}");
    }
}

/// Interval spawn roll, called once per game turn.
pub fn spawn_tick(world: &mut WayfarerWorld) {
    let mut rng = rand::rng();
    spawn_tick_with(world, &mut |max| rng.random_range(1..=max));
}

/// Interval spawn roll with an injected die, so tests stay deterministic.
///
/// `roll(100)` must return a value in `1..=100`; a spawn happens when the
/// roll lands at or under the configured chance.
pub fn spawn_tick_with(world: &mut WayfarerWorld, roll: &mut dyn FnMut(u32) -> u32) {
    let now = world.turn_count;
    let mut due: Vec<(QuestId, ItemId, SpawnData)> = Vec::new();

    for (quest_id, progress) in &world.player.quest_log.entries {
        if !(progress.state.is_active() || progress.state.is_ready_to_complete()) {
            continue;
        }
        let Some(quest) = world.quests.get(quest_id) else {
            continue;
        };
        let turns_active = now.saturating_sub(progress.activated_turn);
        if turns_active == 0 {
            continue;
        }
        for (item_id, spawn) in spawn_specs(quest) {
            if turns_active % spawn.interval == 0 {
                due.push((*quest_id, item_id, spawn.clone()));
            }
        }
    }

    for (quest_id, item_id, spawn) in due {
        let current = world
            .locations
            .get(&spawn.location)
            .map_or(0, |location| location.count_of(item_id));
        if current >= spawn.max_on_location {
            continue;
        }
        if roll(100) <= spawn.chance {
            let added = place_capped(world, item_id, &spawn);
            if added > 0 {
                info!(
                    "quest {quest_id}: interval spawn of {added} x item {item_id} at location {}",
                    spawn.location
                );
            }
        }
    }
}

/// Remove every remaining collectible this quest's conditions spawned.
pub fn despawn_for_quest(world: &mut WayfarerWorld, quest: &Quest) {
    let specs: Vec<(ItemId, SpawnData)> = spawn_specs(quest).map(|(item, spawn)| (item, spawn.clone())).collect();
    let mut removed_total = 0;
    for (item_id, spawn) in specs {
        if let Some(location) = world.locations.get_mut(&spawn.location) {
            let count = location.count_of(item_id);
            removed_total += location.remove_items(item_id, count);
        }
    }
    if removed_total > 0 {
        info!("quest {}: despawned {removed_total} leftover collectibles", quest.id);
    }
}

/// Iterate `(item id, spawn data)` pairs across a quest's collect conditions.
fn spawn_specs(quest: &Quest) -> impl Iterator<Item = (ItemId, &SpawnData)> {
    quest.conditions.iter().flat_map(|condition| match condition {
        QuestCondition::CollectItems { item, spawns, .. } => {
            spawns.iter().map(|spawn| (*item, spawn)).collect::<Vec<_>>()
        },
        _ => Vec::new(),
    })
}

/// Add up to `quantity` of an item at the spawn's location, never exceeding
/// the location cap. Returns how many were actually placed.
fn place_capped(world: &mut WayfarerWorld, item_id: ItemId, spawn: &SpawnData) -> u32 {
    let Some(location) = world.locations.get_mut(&spawn.location) else {
        return 0;
    };
    let current = location.count_of(item_id);
    let room_left = spawn.max_on_location.saturating_sub(current);
    let added = spawn.quantity.min(room_left);
    location.add_items(item_id, added);
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::quest::{QuestNodes, QuestState, Rewards, seed_quest_log, start_quest};
    use std::collections::{HashMap, HashSet};

    fn make_location(id: LocationId) -> Location {
        Location {
            id,
            name: format!("Location {id}"),
            description: String::new(),
            exits: Vec::new(),
            npcs: HashSet::new(),
            monsters: HashSet::new(),
            ground_items: HashMap::new(),
            visited: false,
        }
    }

    fn collect_quest(spawns: Vec<SpawnData>) -> Quest {
        Quest {
            id: 5001,
            name: "Mushroom Run".into(),
            giver: 10,
            conditions: vec![QuestCondition::CollectItems {
                item: 300,
                required: 5,
                spawns,
            }],
            prerequisites: Vec::new(),
            rewards: Rewards::default(),
            dialogue_nodes: QuestNodes {
                offer: "offer".into(),
                in_progress: "progress".into(),
                ready_to_complete: "ready".into(),
                completed: "done".into(),
            },
        }
    }

    fn spawn_at(location: LocationId) -> SpawnData {
        SpawnData {
            location,
            chance: 100,
            quantity: 2,
            max_on_location: 3,
            interval: 1,
        }
    }

    fn build_world(spawns: Vec<SpawnData>) -> WayfarerWorld {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(1, make_location(1));
        world.locations.insert(2, make_location(2));
        world.locations.insert(3, make_location(3));
        world.player.location = 1;
        let quest = collect_quest(spawns);
        world.quests.insert(quest.id, quest);
        seed_quest_log(&mut world);
        let mut messages = Vec::new();
        start_quest(&mut world, 5001, &mut messages).unwrap();
        world
    }

    fn location_count(world: &WayfarerWorld, location_id: LocationId) -> u32 {
        world.locations.get(&location_id).unwrap().count_of(300)
    }

    #[test]
    fn on_visit_seeds_all_configured_locations_once() {
        let mut world = build_world(vec![spawn_at(2), spawn_at(3)]);

        on_visit(&mut world, 2);
        assert_eq!(location_count(&world, 2), 2);
        assert_eq!(location_count(&world, 3), 2);
        assert!(world.player.quest_log.entries.get(&5001).unwrap().items_spawned);

        // one-shot: clearing the ground and visiting again seeds nothing
        world.locations.get_mut(&2).unwrap().remove_items(300, 2);
        on_visit(&mut world, 2);
        assert_eq!(location_count(&world, 2), 0);
    }

    #[test]
    fn on_visit_ignores_irrelevant_locations() {
        let mut world = build_world(vec![spawn_at(2)]);
        on_visit(&mut world, 3);
        assert_eq!(location_count(&world, 2), 0);
        assert!(!world.player.quest_log.entries.get(&5001).unwrap().items_spawned);
    }

    #[test]
    fn on_visit_does_nothing_before_activation() {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(1, make_location(1));
        world.locations.insert(2, make_location(2));
        world.player.location = 1;
        let quest = collect_quest(vec![spawn_at(2)]);
        world.quests.insert(quest.id, quest);
        seed_quest_log(&mut world);
        assert_eq!(world.player.quest_log.state_of(5001), Some(QuestState::Available));

        on_visit(&mut world, 2);
        assert_eq!(location_count(&world, 2), 0);
    }

    #[test]
    fn interval_ticks_never_exceed_location_cap() {
        let mut world = build_world(vec![spawn_at(2)]);
        for turn in 1..=10 {
            world.turn_count = turn;
            spawn_tick_with(&mut world, &mut |_| 1);
            assert!(location_count(&world, 2) <= 3, "cap exceeded on turn {turn}");
        }
        assert_eq!(location_count(&world, 2), 3);
    }

    #[test]
    fn interval_gates_spawn_rolls() {
        let mut spawn = spawn_at(2);
        spawn.interval = 3;
        let mut world = build_world(vec![spawn]);

        world.turn_count = 1;
        spawn_tick_with(&mut world, &mut |_| 1);
        world.turn_count = 2;
        spawn_tick_with(&mut world, &mut |_| 1);
        assert_eq!(location_count(&world, 2), 0);

        world.turn_count = 3;
        spawn_tick_with(&mut world, &mut |_| 1);
        assert_eq!(location_count(&world, 2), 2);
    }

    #[test]
    fn failed_chance_roll_spawns_nothing() {
        let mut spawn = spawn_at(2);
        spawn.chance = 50;
        let mut world = build_world(vec![spawn]);
        world.turn_count = 1;
        spawn_tick_with(&mut world, &mut |_| 51);
        assert_eq!(location_count(&world, 2), 0);

        world.turn_count = 2;
        spawn_tick_with(&mut world, &mut |_| 50);
        assert_eq!(location_count(&world, 2), 2);
    }

    #[test]
    fn ticks_ignore_quests_not_in_flight() {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(2, make_location(2));
        let quest = collect_quest(vec![spawn_at(2)]);
        world.quests.insert(quest.id, quest);
        seed_quest_log(&mut world);

        world.turn_count = 5;
        spawn_tick_with(&mut world, &mut |_| 1);
        assert_eq!(location_count(&world, 2), 0);
    }

    #[test]
    fn despawn_clears_every_configured_location() {
        let mut world = build_world(vec![spawn_at(2), spawn_at(3)]);
        on_visit(&mut world, 2);
        assert_eq!(location_count(&world, 2), 2);
        assert_eq!(location_count(&world, 3), 2);

        let quest = world.quests.get(&5001).unwrap().clone();
        despawn_for_quest(&mut world, &quest);
        assert_eq!(location_count(&world, 2), 0);
        assert_eq!(location_count(&world, 3), 0);
    }
}
