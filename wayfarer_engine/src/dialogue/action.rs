//! action.rs -- response actions.
//!
//! When the player picks a response, its authored actions run strictly in
//! array order, best-effort: one action failing (or failing to parse) is
//! logged and skipped, and the rest still run. Nothing is ever rolled back;
//! abandoning a dialogue later does not undo actions already executed.

use anyhow::{Result, bail};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wayfarer_data::ActionDef;

use crate::item::ItemHolder;
use crate::quest::{self, GameEvent};
use crate::world::{ItemId, QuestId, WayfarerWorld};

/// Parse failure for an authored action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action type '{0}'")]
    UnknownAction(String),
    #[error("bad parameter '{param}' for action '{kind}'")]
    BadParam { kind: String, param: String },
}

/// The closed set of actions a response can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueCommand {
    StartQuest(QuestId),
    CompleteQuest(QuestId),
    /// Hand the session over to the trading collaborator.
    StartTrade,
    EndDialogue,
    GiveGold(u32),
    GiveItem { item: ItemId, quantity: u32 },
    SetFlag(String),
}

impl DialogueCommand {
    /// Parse an authored `{type, param}` action.
    ///
    /// # Errors
    /// - on an unrecognized type tag or an unusable parameter
    pub fn parse(def: &ActionDef) -> Result<Self, ActionError> {
        let kind = def.kind.trim();
        let param = def.param.trim();
        let numeric = || {
            param.parse::<u32>().map_err(|_| ActionError::BadParam {
                kind: kind.to_string(),
                param: param.to_string(),
            })
        };

        match kind {
            "StartQuest" => Ok(DialogueCommand::StartQuest(numeric()?)),
            "CompleteQuest" => Ok(DialogueCommand::CompleteQuest(numeric()?)),
            "StartTrade" => Ok(DialogueCommand::StartTrade),
            "EndDialogue" => Ok(DialogueCommand::EndDialogue),
            "GiveGold" => Ok(DialogueCommand::GiveGold(numeric()?)),
            "GiveItem" => {
                // param is "item_id" or "item_id,quantity"
                let bad = || ActionError::BadParam {
                    kind: kind.to_string(),
                    param: param.to_string(),
                };
                let (item_text, quantity_text) = match param.split_once(',') {
                    Some((item, quantity)) => (item.trim(), quantity.trim()),
                    None => (param, "1"),
                };
                let item = item_text.parse::<u32>().map_err(|_| bad())?;
                let quantity = quantity_text.parse::<u32>().map_err(|_| bad())?;
                if quantity == 0 {
                    return Err(bad());
                }
                Ok(DialogueCommand::GiveItem { item, quantity })
            },
            "SetFlag" => {
                if param.is_empty() {
                    Err(ActionError::BadParam {
                        kind: kind.to_string(),
                        param: param.to_string(),
                    })
                } else {
                    Ok(DialogueCommand::SetFlag(param.to_string()))
                }
            },
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

/// What a batch of actions asked the session layer to do, plus any lines the
/// player should see.
#[derive(Debug, Clone, Default)]
pub struct ActionOutcome {
    pub end_dialogue: bool,
    pub trade_requested: bool,
    pub messages: Vec<String>,
}

/// Apply a response's actions to the world, in authored order.
///
/// Unknown action types and failed actions are logged and skipped; the
/// dialogue continues either way.
pub fn apply_actions(world: &mut WayfarerWorld, actions: &[ActionDef]) -> ActionOutcome {
    let mut outcome = ActionOutcome::default();
    for def in actions {
        let command = match DialogueCommand::parse(def) {
            Ok(command) => command,
            Err(err) => {
                warn!("dialogue action '{}' ignored ({err})", def.kind);
                continue;
            },
        };
        info!("dialogue action: {command:?}");
        if let Err(err) = dispatch_command(world, &command, &mut outcome) {
            warn!("dialogue action {command:?} failed ({err:#}); continuing");
        }
    }
    outcome
}

/// Fires the matching action by calling its handler function.
fn dispatch_command(world: &mut WayfarerWorld, command: &DialogueCommand, outcome: &mut ActionOutcome) -> Result<()> {
    use DialogueCommand::*;
    match command {
        StartQuest(quest_id) => quest::start_quest(world, *quest_id, &mut outcome.messages)?,
        CompleteQuest(quest_id) => quest::complete_quest(world, *quest_id, &mut outcome.messages)?,
        StartTrade => {
            info!("dialogue requested a trade session");
            outcome.trade_requested = true;
        },
        EndDialogue => outcome.end_dialogue = true,
        GiveGold(amount) => world.player.add_gold(*amount),
        GiveItem { item, quantity } => give_item(world, *item, *quantity, &mut outcome.messages)?,
        SetFlag(name) => {
            world.player.set_flag(name);
        },
    }
    Ok(())
}

fn give_item(world: &mut WayfarerWorld, item_id: ItemId, quantity: u32, messages: &mut Vec<String>) -> Result<()> {
    if !world.items.contains_key(&item_id) {
        bail!("GiveItem names unknown item id {item_id}");
    }
    world.player.add_items(item_id, quantity);
    messages.push(format!("Received: {quantity} x {}.", world.item_name(item_id)));

    for (quest_id, state) in quest::process_event(world, &GameEvent::ItemPickedUp(item_id)) {
        if state.is_ready_to_complete() {
            messages.push(format!("'{}' is ready to turn in.", world.quest_name(quest_id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::quest::{Quest, QuestNodes, QuestState, Rewards, seed_quest_log};
    use crate::world::WayfarerWorld;
    use std::collections::{HashMap, HashSet};

    fn action(kind: &str, param: &str) -> ActionDef {
        ActionDef {
            kind: kind.into(),
            param: param.into(),
        }
    }

    fn build_test_world() -> WayfarerWorld {
        let mut world = WayfarerWorld::new_empty();
        world.locations.insert(
            1,
            crate::location::Location {
                id: 1,
                name: "Village".into(),
                description: String::new(),
                exits: Vec::new(),
                npcs: HashSet::new(),
                monsters: HashSet::new(),
                ground_items: HashMap::new(),
                visited: false,
            },
        );
        world.player.location = 1;
        world.items.insert(
            300,
            Item {
                id: 300,
                name: "Widget".into(),
                description: String::new(),
            },
        );
        let quest = Quest {
            id: 5001,
            name: "Widget Run".into(),
            giver: 10,
            conditions: Vec::new(),
            prerequisites: Vec::new(),
            rewards: Rewards::default(),
            dialogue_nodes: QuestNodes {
                offer: "offer".into(),
                in_progress: "progress".into(),
                ready_to_complete: "ready".into(),
                completed: "done".into(),
            },
        };
        world.quests.insert(quest.id, quest);
        seed_quest_log(&mut world);
        world
    }

    #[test]
    fn parse_recognizes_the_closed_set() {
        assert_eq!(
            DialogueCommand::parse(&action("StartQuest", "5001")),
            Ok(DialogueCommand::StartQuest(5001))
        );
        assert_eq!(
            DialogueCommand::parse(&action("GiveItem", "300")),
            Ok(DialogueCommand::GiveItem { item: 300, quantity: 1 })
        );
        assert_eq!(
            DialogueCommand::parse(&action("GiveItem", "300, 4")),
            Ok(DialogueCommand::GiveItem { item: 300, quantity: 4 })
        );
        assert_eq!(DialogueCommand::parse(&action("StartTrade", "")), Ok(DialogueCommand::StartTrade));
        assert_eq!(
            DialogueCommand::parse(&action("SetFlag", "met_elder")),
            Ok(DialogueCommand::SetFlag("met_elder".into()))
        );
    }

    #[test]
    fn parse_rejects_unknown_and_bad_params() {
        assert!(matches!(
            DialogueCommand::parse(&action("SummonDragon", "9")),
            Err(ActionError::UnknownAction(_))
        ));
        assert!(matches!(
            DialogueCommand::parse(&action("GiveGold", "lots")),
            Err(ActionError::BadParam { .. })
        ));
        assert!(matches!(
            DialogueCommand::parse(&action("GiveItem", "300,0")),
            Err(ActionError::BadParam { .. })
        ));
    }

    #[test]
    fn actions_apply_in_order_and_best_effort() {
        let mut world = build_test_world();
        let outcome = apply_actions(
            &mut world,
            &[
                action("SetFlag", "met_elder"),
                action("NoSuchAction", "1"),
                action("GiveGold", "15"),
                action("GiveItem", "999"), // unknown item: logged no-op
                action("GiveGold", "5"),
            ],
        );
        assert!(world.player.has_flag("met_elder"));
        assert_eq!(world.player.gold, 20);
        assert!(!outcome.end_dialogue);
    }

    #[test]
    fn give_item_adds_to_inventory_and_reports() {
        let mut world = build_test_world();
        let outcome = apply_actions(&mut world, &[action("GiveItem", "300,3")]);
        assert_eq!(world.player.count_of(300), 3);
        assert!(outcome.messages.iter().any(|m| m.contains("Widget")));
    }

    #[test]
    fn set_flag_twice_equals_once() {
        let mut world = build_test_world();
        apply_actions(&mut world, &[action("SetFlag", "x"), action("SetFlag", "x")]);
        let flags_after = world.player.flags.clone();

        let mut world_single = build_test_world();
        apply_actions(&mut world_single, &[action("SetFlag", "x")]);
        assert_eq!(flags_after, world_single.player.flags);
    }

    #[test]
    fn end_dialogue_and_trade_surface_in_outcome() {
        let mut world = build_test_world();
        let outcome = apply_actions(&mut world, &[action("StartTrade", ""), action("EndDialogue", "")]);
        assert!(outcome.trade_requested);
        assert!(outcome.end_dialogue);
    }

    #[test]
    fn start_quest_action_drives_the_lifecycle() {
        let mut world = build_test_world();
        apply_actions(&mut world, &[action("StartQuest", "5001")]);
        // no conditions, so the quest sails straight to ready
        assert_eq!(world.player.quest_log.state_of(5001), Some(QuestState::ReadyToComplete));

        let outcome = apply_actions(&mut world, &[action("CompleteQuest", "5001")]);
        assert_eq!(world.player.quest_log.state_of(5001), Some(QuestState::Completed));
        assert!(outcome.messages.iter().any(|m| m.contains("Quest complete")));
    }

    #[test]
    fn start_quest_on_unknown_id_is_logged_noop() {
        let mut world = build_test_world();
        let outcome = apply_actions(&mut world, &[action("StartQuest", "42424"), action("GiveGold", "3")]);
        assert_eq!(world.player.gold, 3);
        assert!(!outcome.end_dialogue);
    }
}
