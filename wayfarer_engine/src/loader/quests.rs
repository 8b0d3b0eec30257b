//! Quest loader submodule.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use wayfarer_data::{QuestConditionDef, QuestDef, SpawnDataDef};

use crate::quest::{Quest, QuestCondition, QuestNodes, RewardItem, Rewards, SpawnData};
use crate::world::QuestId;

#[derive(Debug, Deserialize)]
struct RawQuestFile {
    quests: Vec<QuestDef>,
}

/// Loads quest definitions from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_quests(json_path: &Path) -> Result<Vec<QuestDef>> {
    let contents =
        fs::read_to_string(json_path).with_context(|| format!("reading quest data from '{}'", json_path.display()))?;
    let wrapper: RawQuestFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing quest data from '{}'", json_path.display()))?;
    info!("{} raw quests loaded from '{}'", wrapper.quests.len(), json_path.display());
    Ok(wrapper.quests)
}

/// Builds the runtime quest catalog from its definitions.
pub fn build_quests(defs: &[QuestDef]) -> HashMap<QuestId, Quest> {
    defs.iter().map(|def| (def.id, quest_from_def(def))).collect()
}

fn quest_from_def(def: &QuestDef) -> Quest {
    Quest {
        id: def.id,
        name: def.name.clone(),
        giver: def.giver,
        conditions: def.conditions.iter().map(condition_from_def).collect(),
        prerequisites: def.prerequisites.clone(),
        rewards: Rewards {
            gold: def.rewards.gold,
            experience: def.rewards.experience,
            items: def
                .rewards
                .items
                .iter()
                .map(|reward| RewardItem {
                    item: reward.item,
                    quantity: reward.quantity,
                })
                .collect(),
        },
        dialogue_nodes: QuestNodes {
            offer: def.dialogue_nodes.offer.clone(),
            in_progress: def.dialogue_nodes.in_progress.clone(),
            ready_to_complete: def.dialogue_nodes.ready_to_complete.clone(),
            completed: def.dialogue_nodes.completed.clone(),
        },
    }
}

fn condition_from_def(def: &QuestConditionDef) -> QuestCondition {
    match def {
        QuestConditionDef::CollectItems { item, required, spawns } => QuestCondition::CollectItems {
            item: *item,
            required: *required,
            spawns: spawns.iter().map(spawn_from_def).collect(),
        },
        QuestConditionDef::KillMonsters { monster, required } => QuestCondition::KillMonsters {
            monster: *monster,
            required: *required,
        },
        QuestConditionDef::VisitLocation { location } => QuestCondition::VisitLocation { location: *location },
        QuestConditionDef::TalkToNpc { npc } => QuestCondition::TalkToNpc { npc: *npc },
        QuestConditionDef::ReachLevel { level } => QuestCondition::ReachLevel { level: *level },
    }
}

fn spawn_from_def(def: &SpawnDataDef) -> SpawnData {
    SpawnData {
        location: def.location,
        chance: def.chance,
        quantity: def.quantity,
        max_on_location: def.max_on_location,
        interval: def.interval,
    }
}
