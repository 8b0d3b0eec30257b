//! Dialogue module --
//!
//! Conversation graphs: each NPC owns a [`DialogueDoc`], a named graph of
//! nodes with player-selectable responses. Responses carry a guard predicate
//! (condition.rs), a list of authored actions (action.rs), and a target node.
//! Entry-node resolution lives in resolver.rs and the turn-by-turn session
//! state machine in session.rs.

pub mod action;
pub mod condition;
pub mod resolver;
pub mod session;

pub use action::{ActionOutcome, DialogueCommand, apply_actions};
pub use condition::{Predicate, evaluate};
pub use resolver::{resolve_entry_node, visible_responses};
pub use session::DialogueSession;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::world::NodeId;
pub use wayfarer_data::ActionDef;

/// A named conversation graph for one NPC context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueDoc {
    pub id: String,
    pub name: String,
    pub start: NodeId,
    pub nodes: HashMap<NodeId, DialogueNode>,
}

/// One block of NPC text plus the responses available from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,
    pub text: String,
    pub kind: String,
    pub responses: Vec<Response>,
}

/// A player-selectable line with an optional guard predicate and actions.
///
/// The condition stays a string here: the evaluator parses it against the
/// closed predicate grammar at each check and fails closed, while the loader
/// has already parsed everything once to surface author errors at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    /// Node to continue to; empty ends the dialogue.
    pub target: NodeId,
    /// Predicate string; empty means always visible.
    pub condition: String,
    pub actions: Vec<ActionDef>,
}

impl Response {
    pub fn ends_dialogue(&self) -> bool {
        self.target.is_empty()
    }
}

impl DialogueDoc {
    pub fn get_node(&self, node_id: &str) -> Option<&DialogueNode> {
        self.nodes.get(node_id)
    }

    /// Collect every node reachable from `from` by following response targets.
    ///
    /// Dialogue graphs may legitimately cycle back to hub nodes, so the walk
    /// is iterative with an explicit visited set rather than recursive.
    pub fn reachable_nodes(&self, from: &str) -> HashSet<&NodeId> {
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut pending: Vec<&str> = vec![from];

        while let Some(current) = pending.pop() {
            let Some((key, node)) = self.nodes.get_key_value(current) else {
                continue;
            };
            if !visited.insert(key) {
                continue;
            }
            for response in &node.responses {
                if !response.target.is_empty() && !visited.contains(&response.target) {
                    pending.push(response.target.as_str());
                }
            }
        }
        visited
    }

    /// Node ids that can never be reached from the start node.
    ///
    /// Harmless at runtime but worth surfacing to authors at load time.
    pub fn orphaned_nodes(&self) -> Vec<&NodeId> {
        let reachable = self.reachable_nodes(&self.start);
        let mut orphans: Vec<&NodeId> = self.nodes.keys().filter(|id| !reachable.contains(id)).collect();
        orphans.sort();
        orphans
    }
}
