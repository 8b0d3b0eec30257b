//! session.rs -- the cooperative dialogue state machine.
//!
//! A session presents one node at a time and waits for the next player
//! choice; there is no background driver. Choosing a response applies its
//! actions (at-least-once, no rollback) and follows its target. Abandoning a
//! session at any node is always legal and undoes nothing.

use anyhow::{Result, bail};
use log::{info, warn};

use crate::dialogue::{DialogueNode, Response, action, resolver};
use crate::quest::{self, GameEvent};
use crate::world::{NodeId, NpcId, WayfarerWorld};

pub use crate::dialogue::action::ActionOutcome;

/// One in-flight conversation with an NPC.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    pub npc_id: NpcId,
    current: Option<NodeId>,
}

impl DialogueSession {
    /// Open a conversation: record the talk event (which may itself advance
    /// a quest), then resolve the entry node.
    ///
    /// Returns the session plus any player-facing lines produced by quest
    /// state changes the talk event caused.
    ///
    /// # Errors
    /// - if the NPC or its dialogue document is missing
    pub fn begin(world: &mut WayfarerWorld, npc_id: NpcId) -> Result<(DialogueSession, Vec<String>)> {
        let mut messages = Vec::new();
        for (quest_id, state) in quest::process_event(world, &GameEvent::TalkedToNpc(npc_id)) {
            if state.is_ready_to_complete() {
                messages.push(format!("'{}' is ready to turn in.", world.quest_name(quest_id)));
            }
        }

        let entry = resolver::resolve_entry_node(world, npc_id)?;
        info!("dialogue session with npc {npc_id} opened at node '{entry}'");
        Ok((
            DialogueSession {
                npc_id,
                current: Some(entry),
            },
            messages,
        ))
    }

    /// The node currently presented, if the session is still open.
    pub fn current_node<'a>(&self, world: &'a WayfarerWorld) -> Option<&'a DialogueNode> {
        let node_id = self.current.as_ref()?;
        world
            .npc_dialogue_ref(self.npc_id)
            .ok()
            .and_then(|doc| doc.get_node(node_id))
    }

    /// Currently visible responses with their original indices.
    pub fn visible_responses<'a>(&self, world: &'a WayfarerWorld) -> Vec<(usize, &'a Response)> {
        self.current_node(world)
            .map(|node| resolver::visible_responses(world, node))
            .unwrap_or_default()
    }

    /// Choose a response by its original index within the current node.
    ///
    /// The guard predicate is re-checked at choice time; a response that is
    /// no longer visible does nothing beyond telling the player so. Actions
    /// run in order, then the session follows the target: an empty or
    /// unresolvable target ends the dialogue (the latter with a warning,
    /// never a fault).
    ///
    /// # Errors
    /// - if the session is already over or the index names no response
    pub fn choose(&mut self, world: &mut WayfarerWorld, response_index: usize) -> Result<ActionOutcome> {
        let Some(node_id) = self.current.clone() else {
            bail!("dialogue session with npc {} is already over", self.npc_id);
        };
        let Some(node) = self.current_node(world) else {
            // content shifted under us; treat like a dangling target
            warn!("current node '{node_id}' vanished from dialogue; ending session");
            self.current = None;
            return Ok(ActionOutcome::default());
        };
        let Some(response) = node.responses.get(response_index) else {
            bail!("node '{node_id}' has no response at index {response_index}");
        };
        let response = response.clone();

        if !crate::dialogue::condition::evaluate(&response.condition, world) {
            let mut outcome = ActionOutcome::default();
            outcome.messages.push("That option is no longer open to you.".into());
            return Ok(outcome);
        }

        let outcome = action::apply_actions(world, &response.actions);

        if outcome.end_dialogue || response.ends_dialogue() {
            self.current = None;
        } else if self
            .target_exists(world, &response.target)
        {
            self.current = Some(response.target.clone());
        } else {
            warn!(
                "response target '{}' not found in dialogue for npc {}; ending session",
                response.target, self.npc_id
            );
            self.current = None;
        }
        Ok(outcome)
    }

    /// Walk away mid-conversation. Already-executed actions stay executed.
    pub fn abandon(&mut self) {
        if self.current.is_some() {
            info!("dialogue session with npc {} abandoned", self.npc_id);
            self.current = None;
        }
    }

    pub fn is_over(&self) -> bool {
        self.current.is_none()
    }

    fn target_exists(&self, world: &WayfarerWorld, target: &str) -> bool {
        world
            .npc_dialogue_ref(self.npc_id)
            .ok()
            .is_some_and(|doc| doc.get_node(target).is_some())
    }
}
