//! NPC Module

use serde::{Deserialize, Serialize};

use crate::world::{DialogueId, LocationId, NpcId, QuestId};

/// A non-playable character: one dialogue document plus the quests they give.
///
/// `quests_to_give` order is a contract: the entry-node resolver walks it
/// front to back within each lifecycle tier, so earlier quests win ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub description: String,
    pub location: LocationId,
    pub dialogue_id: DialogueId,
    pub quests_to_give: Vec<QuestId>,
}
