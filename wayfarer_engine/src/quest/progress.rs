//! Quest condition tracking and event-driven re-evaluation.
//!
//! Game events (pickups, drops, kills, movement, conversation, level-ups)
//! are funneled through [`process_event`]; it updates the persisted trackers
//! and then re-derives each active quest's lifecycle state. There is no
//! timer: if no relevant event fires, no state can change.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::item::ItemHolder;
use crate::quest::{ConditionProgress, Quest, QuestCondition, QuestProgress, QuestState};
use crate::world::{ItemId, LocationId, MonsterId, NpcId, QuestId, WayfarerWorld};

/// Something that happened in the world that quest conditions may care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ItemPickedUp(ItemId),
    ItemDropped(ItemId),
    MonsterKilled(MonsterId),
    LocationEntered(LocationId),
    TalkedToNpc(NpcId),
    LevelUp(u32),
}

/// Current and required progress for one condition.
///
/// Collect and level conditions re-query live state: dropping collected
/// items lowers the current count. Kill counts and one-shot booleans come
/// from the persisted tracker.
pub fn condition_progress(world: &WayfarerWorld, condition: &QuestCondition, tracker: &ConditionProgress) -> (u32, u32) {
    match (condition, tracker) {
        (QuestCondition::CollectItems { item, required, .. }, ConditionProgress::Collect) => {
            (world.player.count_of(*item), *required)
        },
        (QuestCondition::KillMonsters { required, .. }, ConditionProgress::Kill { count }) => (*count, *required),
        (QuestCondition::VisitLocation { .. }, ConditionProgress::Visit { done })
        | (QuestCondition::TalkToNpc { .. }, ConditionProgress::Talk { done }) => (u32::from(*done), 1),
        (QuestCondition::ReachLevel { level }, ConditionProgress::Level) => (world.player.level, *level),
        (condition, tracker) => {
            // only possible if a save no longer matches the loaded content
            warn!("condition/tracker shape mismatch: {condition:?} vs {tracker:?}");
            (0, 1)
        },
    }
}

/// True when every condition of the quest is currently satisfied.
///
/// Conditions combine with AND; a quest with no conditions is trivially
/// satisfiable.
pub fn quest_satisfied(world: &WayfarerWorld, quest: &Quest, progress: &QuestProgress) -> bool {
    quest
        .conditions
        .iter()
        .zip(progress.conditions.iter())
        .all(|(condition, tracker)| {
            let (current, required) = condition_progress(world, condition, tracker);
            current >= required
        })
}

/// Record a game event against every active quest, then re-derive states.
///
/// Returns the `(quest id, new state)` pairs that changed.
pub fn process_event(world: &mut WayfarerWorld, event: &GameEvent) -> Vec<(QuestId, QuestState)> {
    // Tracker updates only apply to quests the player is actively working
    // on; a kill before the quest starts does not count toward it.
    let quests = &world.quests;
    for (quest_id, progress) in &mut world.player.quest_log.entries {
        if !(progress.state.is_active() || progress.state.is_ready_to_complete()) {
            continue;
        }
        let Some(quest) = quests.get(quest_id) else {
            continue;
        };
        for (condition, tracker) in quest.conditions.iter().zip(progress.conditions.iter_mut()) {
            update_tracker(*quest_id, event, condition, tracker);
        }
    }

    refresh_quest_states(world)
}

fn update_tracker(quest_id: QuestId, event: &GameEvent, condition: &QuestCondition, tracker: &mut ConditionProgress) {
    match (event, condition, tracker) {
        (
            GameEvent::MonsterKilled(monster_id),
            QuestCondition::KillMonsters { monster, .. },
            ConditionProgress::Kill { count },
        ) if monster_id == monster => {
            *count = count.saturating_add(1);
            info!("quest {quest_id}: kill count for monster {monster} now {count}");
        },
        (
            GameEvent::LocationEntered(location_id),
            QuestCondition::VisitLocation { location },
            ConditionProgress::Visit { done },
        ) if location_id == location && !*done => {
            *done = true;
            info!("quest {quest_id}: visit condition for location {location} met");
        },
        (GameEvent::TalkedToNpc(npc_id), QuestCondition::TalkToNpc { npc }, ConditionProgress::Talk { done })
            if npc_id == npc && !*done =>
        {
            *done = true;
            info!("quest {quest_id}: talk condition for npc {npc} met");
        },
        _ => {},
    }
}

/// Re-derive Active/ReadyToComplete for every in-flight quest.
///
/// Live conditions work both directions: a quest that was ready falls back
/// to Active when (for instance) the player drops the items it needed.
/// Returns the `(quest id, new state)` pairs that changed.
pub fn refresh_quest_states(world: &mut WayfarerWorld) -> Vec<(QuestId, QuestState)> {
    let mut flips: Vec<(QuestId, QuestState)> = Vec::new();
    for (quest_id, progress) in &world.player.quest_log.entries {
        let Some(quest) = world.quests.get(quest_id) else {
            continue;
        };
        let satisfied = quest_satisfied(world, quest, progress);
        match progress.state {
            QuestState::Active if satisfied => flips.push((*quest_id, QuestState::ReadyToComplete)),
            QuestState::ReadyToComplete if !satisfied => flips.push((*quest_id, QuestState::Active)),
            _ => {},
        }
    }
    flips.sort_unstable_by_key(|(id, _)| *id);

    for (quest_id, new_state) in &flips {
        if let Some(progress) = world.player.quest_log.entries.get_mut(quest_id) {
            info!("quest {quest_id} state: {} -> {new_state}", progress.state);
            progress.state = *new_state;
        }
    }
    flips
}
