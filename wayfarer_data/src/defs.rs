use serde::{Deserialize, Serialize};

/// Content-authored numeric identifier for world entities.
pub type EntityId = u32;

pub type LocationId = EntityId;
pub type ItemId = EntityId;
pub type MonsterId = EntityId;
pub type NpcId = EntityId;
pub type QuestId = EntityId;

/// Dialogue documents and their nodes are keyed by author-chosen strings.
pub type DialogueId = String;
pub type NodeId = String;

/// Top-level world content loaded by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    pub game: GameDef,
    #[serde(default)]
    pub locations: Vec<LocationDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub monsters: Vec<MonsterDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub quests: Vec<QuestDef>,
    #[serde(default)]
    pub dialogues: Vec<DialogueDef>,
}

/// Game-level metadata and startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameDef {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub intro: String,
    pub player: PlayerDef,
}

/// Starting state for the player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDef {
    pub name: String,
    pub start_location: LocationId,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub experience: u32,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            start_location: 0,
            gold: 0,
            experience: 0,
        }
    }
}

/// A place the player can stand in, walk to, and collect things from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDef {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub exits: Vec<LocationId>,
    #[serde(default)]
    pub monsters: Vec<MonsterId>,
}

/// Catalog entry for a collectible or reward item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// Catalog entry for a monster; combat itself happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterDef {
    pub id: MonsterId,
    pub name: String,
}

/// A quest-giving character with an attached dialogue document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: NpcId,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub location: LocationId,
    pub dialogue: DialogueId,
    /// Quests this NPC hands out, in priority order for entry-node resolution.
    #[serde(default)]
    pub quests_to_give: Vec<QuestId>,
}

/// A quest definition: giver, completion conditions, rewards, and the
/// dialogue nodes each lifecycle state maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: QuestId,
    pub name: String,
    pub giver: NpcId,
    #[serde(default)]
    pub conditions: Vec<QuestConditionDef>,
    #[serde(default)]
    pub prerequisites: Vec<QuestId>,
    #[serde(default)]
    pub rewards: RewardsDef,
    pub dialogue_nodes: QuestNodesDef,
}

/// One requirement that must hold for a quest to be completable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QuestConditionDef {
    CollectItems {
        item: ItemId,
        required: u32,
        #[serde(default)]
        spawns: Vec<SpawnDataDef>,
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
pub struct SpawnDataDef {
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
pub struct RewardsDef {
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub items: Vec<RewardItemDef>,
}

/// A single item grant within a quest's rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardItemDef {
    pub item: ItemId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Dialogue nodes a quest routes conversation to in each lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestNodesDef {
    pub offer: NodeId,
    pub in_progress: NodeId,
    pub ready_to_complete: NodeId,
    pub completed: NodeId,
}

/// A named conversation graph for one NPC context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueDef {
    pub id: DialogueId,
    pub name: String,
    pub start: NodeId,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

/// One block of NPC text plus the responses available from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDef {
    pub id: NodeId,
    pub text: String,
    /// Free-form authoring tag (greeting, quest_offer, ...).
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub responses: Vec<ResponseDef>,
}

/// A player-selectable line with an optional guard predicate and actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDef {
    pub text: String,
    /// Node to continue to; empty string ends the dialogue.
    #[serde(default)]
    pub target: NodeId,
    /// Predicate string; empty means always visible.
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

/// A content-authored action instruction: a type tag plus a string payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub param: String,
}
