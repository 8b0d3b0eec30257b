//! Quest module --
//!
//! Quest definitions live in an immutable catalog on the world; per-player
//! progress (lifecycle state, condition counters, spawn bookkeeping) lives in
//! the player's [`QuestLog`]. Lifecycle transitions all flow through the
//! functions here: `start_quest` and `complete_quest` for the action-driven
//! edges, `unlock_available` for prerequisite gating, and the event-driven
//! re-evaluation in [`progress`].

pub mod progress;

pub use progress::{GameEvent, process_event, refresh_quest_states};

use std::collections::HashMap;
use std::fmt::Display;

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::item::ItemHolder;
use crate::spawner;
use crate::world::{ItemId, LocationId, MonsterId, NodeId, NpcId, QuestId, WayfarerWorld};

/// A quest definition: giver, completion conditions, rewards, and the
/// dialogue nodes each lifecycle state routes conversation to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub name: String,
    pub giver: NpcId,
    pub conditions: Vec<QuestCondition>,
    pub prerequisites: Vec<QuestId>,
    pub rewards: Rewards,
    pub dialogue_nodes: QuestNodes,
}

/// One requirement that must hold for a quest to be completable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestCondition {
    CollectItems {
        item: ItemId,
        required: u32,
        spawns: Vec<SpawnData>,
    },
    KillMonsters {
        monster: MonsterId,
        required: u32,
    },
    VisitLocation {
        location: LocationId,
    },
    TalkToNpc {
        npc: NpcId,
    },
    ReachLevel {
        level: u32,
    },
}

/// Where and how a collect-condition's items materialize in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnData {
    pub location: LocationId,
    /// Percent chance (1-100) per interval roll.
    pub chance: u32,
    pub quantity: u32,
    pub max_on_location: u32,
    /// Game turns between spawn rolls.
    pub interval: usize,
}

/// What the player receives when a quest completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub gold: u32,
    pub experience: u32,
    pub items: Vec<RewardItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardItem {
    pub item: ItemId,
    pub quantity: u32,
}

/// Dialogue nodes a quest routes conversation to in each lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestNodes {
    pub offer: NodeId,
    pub in_progress: NodeId,
    pub ready_to_complete: NodeId,
    pub completed: NodeId,
}

/// Lifecycle state of one quest for one player.
///
/// Transitions never skip a state: Locked -> Available (prerequisites done),
/// Available -> Active (`StartQuest`), Active -> ReadyToComplete (all
/// conditions satisfied), ReadyToComplete -> Completed (`CompleteQuest`).
/// Live conditions can also move ReadyToComplete back to Active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, variantly::Variantly, Serialize, Deserialize)]
pub enum QuestState {
    Locked,
    Available,
    Active,
    ReadyToComplete,
    Completed,
}

impl Display for QuestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestState::Locked => write!(f, "Locked"),
            QuestState::Available => write!(f, "Available"),
            QuestState::Active => write!(f, "Active"),
            QuestState::ReadyToComplete => write!(f, "Ready to complete"),
            QuestState::Completed => write!(f, "Completed"),
        }
    }
}

/// Per-player progress for every quest in the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestLog {
    pub entries: HashMap<QuestId, QuestProgress>,
}

impl QuestLog {
    pub fn state_of(&self, quest_id: QuestId) -> Option<QuestState> {
        self.entries.get(&quest_id).map(|progress| progress.state)
    }

    /// Quests the player is working on (Active or ReadyToComplete), sorted by id.
    pub fn active_quests(&self) -> Vec<QuestId> {
        let mut ids: Vec<QuestId> = self
            .entries
            .iter()
            .filter(|(_, p)| p.state.is_active() || p.state.is_ready_to_complete())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn completed_quests(&self) -> Vec<QuestId> {
        let mut ids: Vec<QuestId> = self
            .entries
            .iter()
            .filter(|(_, p)| p.state.is_completed())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Progress record for one quest: lifecycle state plus one tracker per
/// authored condition (parallel to the quest's condition list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProgress {
    pub state: QuestState,
    pub conditions: Vec<ConditionProgress>,
    /// One-shot guard for the on-visit collectible spawn.
    pub items_spawned: bool,
    /// Turn on which the quest became Active; anchors spawn intervals.
    pub activated_turn: usize,
}

impl QuestProgress {
    pub fn new(quest: &Quest) -> Self {
        Self {
            state: QuestState::Locked,
            conditions: quest.conditions.iter().map(ConditionProgress::new).collect(),
            items_spawned: false,
            activated_turn: 0,
        }
    }
}

/// Mutable tracker for one condition. Live conditions (collect, level) carry
/// no stored counter: they re-query the world each check. Kill counts are
/// monotonic and persisted; visit/talk are one-shot booleans, never reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionProgress {
    Collect,
    Kill { count: u32 },
    Visit { done: bool },
    Talk { done: bool },
    Level,
}

impl ConditionProgress {
    pub fn new(condition: &QuestCondition) -> Self {
        match condition {
            QuestCondition::CollectItems { .. } => ConditionProgress::Collect,
            QuestCondition::KillMonsters { .. } => ConditionProgress::Kill { count: 0 },
            QuestCondition::VisitLocation { .. } => ConditionProgress::Visit { done: false },
            QuestCondition::TalkToNpc { .. } => ConditionProgress::Talk { done: false },
            QuestCondition::ReachLevel { .. } => ConditionProgress::Level,
        }
    }
}

/// Create a fresh quest-log entry for every quest in the catalog, then open
/// up the ones with no unfinished prerequisites.
pub fn seed_quest_log(world: &mut WayfarerWorld) {
    world.player.quest_log.entries = world
        .quests
        .iter()
        .map(|(id, quest)| (*id, QuestProgress::new(quest)))
        .collect();
    let unlocked = unlock_available(world);
    info!(
        "quest log seeded: {} quests, {} immediately available",
        world.player.quest_log.entries.len(),
        unlocked.len()
    );
}

/// Move every Locked quest whose prerequisites are all Completed to Available.
///
/// Returns the ids that changed state.
pub fn unlock_available(world: &mut WayfarerWorld) -> Vec<QuestId> {
    let log = &world.player.quest_log;
    let mut unlocked: Vec<QuestId> = world
        .quests
        .values()
        .filter(|quest| log.state_of(quest.id) == Some(QuestState::Locked))
        .filter(|quest| {
            quest
                .prerequisites
                .iter()
                .all(|prereq| log.state_of(*prereq) == Some(QuestState::Completed))
        })
        .map(|quest| quest.id)
        .collect();
    unlocked.sort_unstable();

    for quest_id in &unlocked {
        if let Some(progress) = world.player.quest_log.entries.get_mut(quest_id) {
            progress.state = QuestState::Available;
            info!("quest {quest_id} unlocked: Locked -> Available");
        }
    }
    unlocked
}

/// Start a quest: Available -> Active.
///
/// Any other starting state is a no-op with a logged warning and a neutral
/// player-facing message. Activation seeds collectibles at the player's
/// current location when it is one of the quest's spawn points.
///
/// # Errors
/// - if the quest id is not in the catalog or the quest log
pub fn start_quest(world: &mut WayfarerWorld, quest_id: QuestId, messages: &mut Vec<String>) -> Result<()> {
    let quest_name = world.quest_ref(quest_id)?.name.clone();
    let progress = world
        .player
        .quest_log
        .entries
        .get_mut(&quest_id)
        .ok_or_else(|| anyhow::anyhow!("quest {quest_id} missing from quest log"))?;

    match progress.state {
        QuestState::Available => {
            progress.state = QuestState::Active;
            progress.activated_turn = world.turn_count;
            info!("quest {quest_id} '{quest_name}' started: Available -> Active");
            messages.push(format!("Quest accepted: {quest_name}."));

            let here = world.player.location;
            spawner::on_visit(world, here);

            // A quest whose conditions already hold flips straight on.
            for (flipped_id, state) in refresh_quest_states(world) {
                if state.is_ready_to_complete() {
                    messages.push(format!("'{}' is ready to turn in.", world.quest_name(flipped_id)));
                }
            }
        },
        state => {
            warn!("StartQuest({quest_id}) ignored: quest is {state}, not Available");
            messages.push(format!("You can't take on '{quest_name}' right now."));
        },
    }
    Ok(())
}

/// Complete a quest: ReadyToComplete -> Completed.
///
/// Grants the rewards as one grouped operation (gold, experience, items, in
/// that order, best-effort with no rollback), despawns any collectibles still
/// out in the world for this quest's conditions, then transitions. Attempting
/// to complete a quest in any other state is a no-op with a logged warning
/// and a "not ready" message.
///
/// # Errors
/// - if the quest id is not in the catalog or the quest log
pub fn complete_quest(world: &mut WayfarerWorld, quest_id: QuestId, messages: &mut Vec<String>) -> Result<()> {
    let quest = world.quest_ref(quest_id)?.clone();
    let state = world
        .player
        .quest_log
        .state_of(quest_id)
        .ok_or_else(|| anyhow::anyhow!("quest {quest_id} missing from quest log"))?;

    if state != QuestState::ReadyToComplete {
        warn!("CompleteQuest({quest_id}) ignored: quest is {state}, not ReadyToComplete");
        messages.push(format!("You're not ready to complete '{}' yet.", quest.name));
        return Ok(());
    }

    world.player.add_gold(quest.rewards.gold);
    let leveled = world.player.add_experience(quest.rewards.experience);
    for reward in &quest.rewards.items {
        world.player.add_items(reward.item, reward.quantity);
    }
    messages.push(format!(
        "Quest complete: {}! You receive {} gold and {} experience.",
        quest.name, quest.rewards.gold, quest.rewards.experience
    ));
    for reward in &quest.rewards.items {
        messages.push(format!("  received: {} x {}", reward.quantity, world.item_name(reward.item)));
    }

    spawner::despawn_for_quest(world, &quest);

    if let Some(progress) = world.player.quest_log.entries.get_mut(&quest_id) {
        progress.state = QuestState::Completed;
    }
    info!("quest {quest_id} '{}' completed: ReadyToComplete -> Completed", quest.name);

    // Reward side effects ripple after the transition so they can't bounce
    // this quest's own state around.
    if leveled {
        messages.push(format!("You are now level {}.", world.player.level));
        process_event(world, &GameEvent::LevelUp(world.player.level));
    }
    let reward_items: Vec<ItemId> = quest.rewards.items.iter().map(|r| r.item).collect();
    let mut flips = Vec::new();
    for item in reward_items {
        flips.extend(process_event(world, &GameEvent::ItemPickedUp(item)));
    }
    for (flipped_id, flip_state) in flips {
        if flip_state.is_ready_to_complete() {
            messages.push(format!("'{}' is ready to turn in.", world.quest_name(flipped_id)));
        }
    }

    for unlocked_id in unlock_available(world) {
        messages.push(format!("New quest available: {}.", world.quest_name(unlocked_id)));
    }
    Ok(())
}
