//! Dialogue loader submodule.

use std::collections::{HashMap, HashSet};
use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;

use wayfarer_data::{DialogueDef, NodeDef};

use crate::dialogue::{DialogueDoc, DialogueNode, Response};
use crate::world::{DialogueId, NodeId, WayfarerWorld};

#[derive(Debug, Deserialize)]
struct RawDialogueFile {
    dialogues: Vec<DialogueDef>,
}

/// Loads dialogue documents from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_dialogues(json_path: &Path) -> Result<Vec<DialogueDef>> {
    let contents = fs::read_to_string(json_path)
        .with_context(|| format!("reading dialogue data from '{}'", json_path.display()))?;
    let wrapper: RawDialogueFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing dialogue data from '{}'", json_path.display()))?;
    info!("{} raw dialogues loaded from '{}'", wrapper.dialogues.len(), json_path.display());
    Ok(wrapper.dialogues)
}

/// Builds runtime dialogue documents, keying nodes by id.
pub fn build_dialogues(defs: &[DialogueDef]) -> HashMap<DialogueId, DialogueDoc> {
    defs.iter()
        .map(|def| {
            (
                def.id.clone(),
                DialogueDoc {
                    id: def.id.clone(),
                    name: def.name.clone(),
                    start: def.start.clone(),
                    nodes: def.nodes.iter().map(|node| (node.id.clone(), node_from_def(node))).collect(),
                },
            )
        })
        .collect()
}

fn node_from_def(def: &NodeDef) -> DialogueNode {
    DialogueNode {
        id: def.id.clone(),
        text: def.text.clone(),
        kind: def.kind.clone(),
        responses: def
            .responses
            .iter()
            .map(|response| Response {
                text: response.text.clone(),
                target: response.target.clone(),
                condition: response.condition.clone(),
                actions: response.actions.clone(),
            })
            .collect(),
    }
}

/// Warn about nodes no conversation can ever reach.
///
/// Entry points are each document's start node plus every node a quest
/// routes to; anything outside their combined reach is dead content worth
/// flagging to authors, though harmless at runtime.
pub fn warn_unreachable_nodes(world: &WayfarerWorld) {
    for (dialogue_id, doc) in &world.dialogues {
        let mut entry_points: Vec<&NodeId> = vec![&doc.start];
        for npc in world.npcs.values().filter(|npc| &npc.dialogue_id == dialogue_id) {
            for quest_id in &npc.quests_to_give {
                if let Some(quest) = world.quests.get(quest_id) {
                    let nodes = &quest.dialogue_nodes;
                    entry_points.extend([
                        &nodes.offer,
                        &nodes.in_progress,
                        &nodes.ready_to_complete,
                        &nodes.completed,
                    ]);
                }
            }
        }

        let mut reachable: HashSet<&NodeId> = HashSet::new();
        for entry in entry_points {
            reachable.extend(doc.reachable_nodes(entry));
        }
        for node_id in doc.nodes.keys() {
            if !reachable.contains(node_id) {
                warn!("dialogue '{dialogue_id}': node '{node_id}' is unreachable from any entry point");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_dialogues_keys_nodes_by_id() {
        let defs = vec![DialogueDef {
            id: "elder".into(),
            name: "Elder".into(),
            start: "greeting".into(),
            nodes: vec![NodeDef {
                id: "greeting".into(),
                text: "Hello.".into(),
                kind: "greeting".into(),
                responses: Vec::new(),
            }],
        }];
        let docs = build_dialogues(&defs);
        assert_eq!(docs.len(), 1);
        assert!(docs.get("elder").unwrap().get_node("greeting").is_some());
    }
}
