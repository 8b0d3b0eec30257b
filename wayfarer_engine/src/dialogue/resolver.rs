//! resolver.rs -- entry-node resolution.
//!
//! Given an NPC, pick the conversation node the player should land on right
//! now. Readiness beats progress beats offering beats small talk, and within
//! a tier the first matching quest in the NPC's authored list wins. The
//! ordering is a deterministic contract the rest of the game relies on.

use anyhow::Result;
use log::warn;

use crate::dialogue::{DialogueNode, Response, condition};
use crate::quest::QuestState;
use crate::world::{NodeId, NpcId, WayfarerWorld};

/// Resolve the entry node for a conversation with `npc_id`.
///
/// Falls back to the dialogue document's start node when no quest state
/// demands otherwise. A quest whose routed node is missing from the document
/// is skipped with a warning rather than derailing the conversation.
///
/// # Errors
/// - if the NPC or its dialogue document is missing from the world
pub fn resolve_entry_node(world: &WayfarerWorld, npc_id: NpcId) -> Result<NodeId> {
    let npc = world.npc_ref(npc_id)?;
    let doc = world.npc_dialogue_ref(npc_id)?;

    for tier in [QuestState::ReadyToComplete, QuestState::Active, QuestState::Available] {
        for quest_id in &npc.quests_to_give {
            if world.player.quest_log.state_of(*quest_id) != Some(tier) {
                continue;
            }
            let Ok(quest) = world.quest_ref(*quest_id) else {
                continue;
            };
            let node_id = match tier {
                QuestState::ReadyToComplete => &quest.dialogue_nodes.ready_to_complete,
                QuestState::Active => &quest.dialogue_nodes.in_progress,
                _ => &quest.dialogue_nodes.offer,
            };
            if doc.get_node(node_id).is_some() {
                return Ok(node_id.clone());
            }
            warn!(
                "quest {quest_id} routes to node '{node_id}' missing from dialogue '{}'; skipping",
                doc.id
            );
        }
    }
    Ok(doc.start.clone())
}

/// Responses of a node the player is currently allowed to see, with their
/// original indices. Guard predicates are evaluated fail-closed.
pub fn visible_responses<'a>(world: &WayfarerWorld, node: &'a DialogueNode) -> Vec<(usize, &'a Response)> {
    node.responses
        .iter()
        .enumerate()
        .filter(|(_, response)| condition::evaluate(&response.condition, world))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{DialogueDoc, DialogueNode, Response};
    use crate::npc::Npc;
    use crate::quest::{Quest, QuestNodes, Rewards, seed_quest_log};
    use std::collections::HashMap;

    fn node(id: &str) -> DialogueNode {
        DialogueNode {
            id: id.into(),
            text: format!("{id} text"),
            kind: String::new(),
            responses: vec![Response {
                text: "Farewell.".into(),
                target: String::new(),
                condition: String::new(),
                actions: Vec::new(),
            }],
        }
    }

    fn quest(id: u32, prefix: &str) -> Quest {
        Quest {
            id,
            name: format!("Quest {id}"),
            giver: 10,
            conditions: Vec::new(),
            prerequisites: Vec::new(),
            rewards: Rewards::default(),
            dialogue_nodes: QuestNodes {
                offer: format!("{prefix}_offer"),
                in_progress: format!("{prefix}_progress"),
                ready_to_complete: format!("{prefix}_ready"),
                completed: format!("{prefix}_done"),
            },
        }
    }

    fn build_test_world() -> WayfarerWorld {
        let mut world = WayfarerWorld::new_empty();
        let mut nodes = HashMap::new();
        for id in [
            "greeting", "x_offer", "x_progress", "x_ready", "x_done", "y_offer", "y_progress", "y_ready", "y_done",
        ] {
            nodes.insert(id.to_string(), node(id));
        }
        world.dialogues.insert(
            "elder".into(),
            DialogueDoc {
                id: "elder".into(),
                name: "Elder".into(),
                start: "greeting".into(),
                nodes,
            },
        );
        world.npcs.insert(
            10,
            Npc {
                id: 10,
                name: "Elder Fedot".into(),
                description: String::new(),
                location: 1,
                dialogue_id: "elder".into(),
                quests_to_give: vec![9001, 9002],
            },
        );
        for q in [quest(9001, "x"), quest(9002, "y")] {
            world.quests.insert(q.id, q);
        }
        seed_quest_log(&mut world);
        world
    }

    fn force_state(world: &mut WayfarerWorld, quest_id: u32, state: QuestState) {
        world.player.quest_log.entries.get_mut(&quest_id).unwrap().state = state;
    }

    #[test]
    fn available_quest_resolves_to_offer_node() {
        let world = build_test_world();
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "x_offer");
    }

    #[test]
    fn readiness_beats_progress_regardless_of_list_order() {
        let mut world = build_test_world();
        // quest X (listed first) is merely active; quest Y (listed second) is ready
        force_state(&mut world, 9001, QuestState::Active);
        force_state(&mut world, 9002, QuestState::ReadyToComplete);
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "y_ready");
    }

    #[test]
    fn first_listed_quest_wins_within_a_tier() {
        let mut world = build_test_world();
        force_state(&mut world, 9001, QuestState::Active);
        force_state(&mut world, 9002, QuestState::Active);
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "x_progress");
    }

    #[test]
    fn no_quest_activity_falls_back_to_greeting() {
        let mut world = build_test_world();
        force_state(&mut world, 9001, QuestState::Completed);
        force_state(&mut world, 9002, QuestState::Completed);
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "greeting");
    }

    #[test]
    fn locked_quests_do_not_offer() {
        let mut world = build_test_world();
        force_state(&mut world, 9001, QuestState::Locked);
        force_state(&mut world, 9002, QuestState::Locked);
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "greeting");
    }

    #[test]
    fn quest_with_missing_node_is_skipped() {
        let mut world = build_test_world();
        force_state(&mut world, 9001, QuestState::ReadyToComplete);
        world.dialogues.get_mut("elder").unwrap().nodes.remove("x_ready");
        // broken branch skipped; next tier match wins instead
        assert_eq!(resolve_entry_node(&world, 10).unwrap(), "y_offer");
    }

    #[test]
    fn unknown_npc_errors() {
        let world = build_test_world();
        assert!(resolve_entry_node(&world, 404).is_err());
    }

    #[test]
    fn visible_responses_filters_on_predicates() {
        let mut world = build_test_world();
        let node = DialogueNode {
            id: "test".into(),
            text: String::new(),
            kind: String::new(),
            responses: vec![
                Response {
                    text: "Always".into(),
                    target: String::new(),
                    condition: String::new(),
                    actions: Vec::new(),
                },
                Response {
                    text: "Gated".into(),
                    target: String::new(),
                    condition: "FlagSet:met_elder".into(),
                    actions: Vec::new(),
                },
                Response {
                    text: "Broken".into(),
                    target: String::new(),
                    condition: "Garbage".into(),
                    actions: Vec::new(),
                },
            ],
        };

        let visible = visible_responses(&world, &node);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0, 0);

        world.player.set_flag("met_elder");
        let visible = visible_responses(&world, &node);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].0, 1);
    }
}
