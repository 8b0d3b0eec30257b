//! condition.rs -- response guard predicates.
//!
//! Content authors gate responses with small `name:param` strings. The
//! grammar is closed: every recognized predicate is a [`Predicate`] variant
//! with an explicit parser, and evaluation is an exhaustive match against
//! the world. The string entry point [`evaluate`] fails closed -- a response
//! guarded by a condition that cannot be trusted stays hidden.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::ItemHolder;
use crate::quest::QuestState;
use crate::world::{ItemId, NpcId, QuestId, WayfarerWorld};

/// Parse failure for a predicate string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("missing ':' separator in '{0}'")]
    Malformed(String),
    #[error("unknown predicate '{0}'")]
    UnknownPredicate(String),
    #[error("bad parameter '{param}' for predicate '{name}'")]
    BadParam { name: String, param: String },
}

/// Conditions a response can be gated on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Any quest given by this NPC is Available.
    QuestAvailableForNpc(NpcId),
    /// Any quest given by this NPC is Active.
    QuestInProgressForNpc(NpcId),
    /// Any quest given by this NPC is ReadyToComplete.
    QuestReadyToCompleteForNpc(NpcId),
    HasItem(ItemId),
    FlagSet(String),
    QuestActive(QuestId),
    /// Player level is at least this value.
    PlayerLevel(u32),
}

impl Predicate {
    /// Parse a `name:param` predicate string.
    ///
    /// # Errors
    /// - on a missing separator, an unrecognized name, or an unusable parameter
    pub fn parse(text: &str) -> Result<Predicate, PredicateError> {
        let Some((name, param)) = text.split_once(':') else {
            return Err(PredicateError::Malformed(text.to_string()));
        };
        let name = name.trim();
        let param = param.trim();
        let numeric = || {
            param.parse::<u32>().map_err(|_| PredicateError::BadParam {
                name: name.to_string(),
                param: param.to_string(),
            })
        };

        match name {
            "questAvailableForNPC" => Ok(Predicate::QuestAvailableForNpc(numeric()?)),
            "questInProgressForNPC" => Ok(Predicate::QuestInProgressForNpc(numeric()?)),
            "questReadyToCompleteForNPC" => Ok(Predicate::QuestReadyToCompleteForNpc(numeric()?)),
            "HasItem" => Ok(Predicate::HasItem(numeric()?)),
            "QuestActive" => Ok(Predicate::QuestActive(numeric()?)),
            "PlayerLevel" => Ok(Predicate::PlayerLevel(numeric()?)),
            "FlagSet" => {
                if param.is_empty() {
                    Err(PredicateError::BadParam {
                        name: name.to_string(),
                        param: param.to_string(),
                    })
                } else {
                    Ok(Predicate::FlagSet(param.to_string()))
                }
            },
            other => Err(PredicateError::UnknownPredicate(other.to_string())),
        }
    }

    /// Evaluate against the current world state. Pure: no side effects.
    pub fn eval(&self, world: &WayfarerWorld) -> bool {
        let npc_has_quest_in = |npc_id: NpcId, state: QuestState| {
            world.npcs.get(&npc_id).is_some_and(|npc| {
                npc.quests_to_give
                    .iter()
                    .any(|quest_id| world.player.quest_log.state_of(*quest_id) == Some(state))
            })
        };

        match self {
            Predicate::QuestAvailableForNpc(npc_id) => npc_has_quest_in(*npc_id, QuestState::Available),
            Predicate::QuestInProgressForNpc(npc_id) => npc_has_quest_in(*npc_id, QuestState::Active),
            Predicate::QuestReadyToCompleteForNpc(npc_id) => npc_has_quest_in(*npc_id, QuestState::ReadyToComplete),
            Predicate::HasItem(item_id) => world.player.has_item(*item_id),
            Predicate::FlagSet(name) => world.player.has_flag(name),
            Predicate::QuestActive(quest_id) => world.player.quest_log.state_of(*quest_id) == Some(QuestState::Active),
            Predicate::PlayerLevel(level) => world.player.level >= *level,
        }
    }
}

/// Evaluate a condition string against the world.
///
/// An empty (or all-whitespace) condition is always true. Unknown or
/// malformed predicates evaluate to false with a logged warning: hiding a
/// broken response beats showing content behind a guard that cannot be
/// trusted.
pub fn evaluate(condition: &str, world: &WayfarerWorld) -> bool {
    let condition = condition.trim();
    if condition.is_empty() {
        return true;
    }
    match Predicate::parse(condition) {
        Ok(predicate) => predicate.eval(world),
        Err(err) => {
            warn!("predicate '{condition}' rejected ({err}); treating as false");
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npc::Npc;
    use crate::quest::{Quest, QuestNodes, Rewards, seed_quest_log};
    use crate::world::WayfarerWorld;

    fn make_quest(id: QuestId, giver: NpcId) -> Quest {
        Quest {
            id,
            name: format!("Quest {id}"),
            giver,
            conditions: Vec::new(),
            prerequisites: Vec::new(),
            rewards: Rewards::default(),
            dialogue_nodes: QuestNodes {
                offer: "offer".into(),
                in_progress: "progress".into(),
                ready_to_complete: "ready".into(),
                completed: "done".into(),
            },
        }
    }

    fn build_test_world() -> WayfarerWorld {
        let mut world = WayfarerWorld::new_empty();
        world.npcs.insert(
            10,
            Npc {
                id: 10,
                name: "Elder Fedot".into(),
                description: String::new(),
                location: 1,
                dialogue_id: "elder".into(),
                quests_to_give: vec![5001],
            },
        );
        let quest = make_quest(5001, 10);
        world.quests.insert(quest.id, quest);
        seed_quest_log(&mut world);
        world
    }

    #[test]
    fn empty_condition_is_always_true() {
        let world = build_test_world();
        assert!(evaluate("", &world));
        assert!(evaluate("   ", &world));
    }

    #[test]
    fn unknown_predicate_fails_closed() {
        let world = build_test_world();
        assert!(!evaluate("SomeNewPredicate:5", &world));
    }

    #[test]
    fn malformed_predicate_fails_closed() {
        let world = build_test_world();
        assert!(!evaluate("HasItem", &world));
        assert!(!evaluate("HasItem:not_a_number", &world));
        assert!(!evaluate("FlagSet:", &world));
    }

    #[test]
    fn parse_errors_name_the_problem() {
        assert_eq!(
            Predicate::parse("nonsense"),
            Err(PredicateError::Malformed("nonsense".into()))
        );
        assert_eq!(
            Predicate::parse("noSuchThing:1"),
            Err(PredicateError::UnknownPredicate("noSuchThing".into()))
        );
        assert!(matches!(
            Predicate::parse("PlayerLevel:banana"),
            Err(PredicateError::BadParam { .. })
        ));
    }

    #[test]
    fn quest_available_tracks_npc_quest_states() {
        let mut world = build_test_world();
        assert!(evaluate("questAvailableForNPC:10", &world));
        assert!(!evaluate("questInProgressForNPC:10", &world));

        world.player.quest_log.entries.get_mut(&5001).unwrap().state = QuestState::Active;
        assert!(!evaluate("questAvailableForNPC:10", &world));
        assert!(evaluate("questInProgressForNPC:10", &world));
        assert!(evaluate("QuestActive:5001", &world));

        world.player.quest_log.entries.get_mut(&5001).unwrap().state = QuestState::ReadyToComplete;
        assert!(evaluate("questReadyToCompleteForNPC:10", &world));
        assert!(!evaluate("QuestActive:5001", &world));
    }

    #[test]
    fn npc_predicates_about_unknown_npcs_are_false() {
        let world = build_test_world();
        assert!(!evaluate("questAvailableForNPC:999", &world));
    }

    #[test]
    fn has_item_checks_inventory() {
        let mut world = build_test_world();
        assert!(!evaluate("HasItem:300", &world));
        world.player.add_items(300, 1);
        assert!(evaluate("HasItem:300", &world));
    }

    #[test]
    fn flag_set_checks_flag() {
        let mut world = build_test_world();
        assert!(!evaluate("FlagSet:met_elder", &world));
        world.player.set_flag("met_elder");
        assert!(evaluate("FlagSet:met_elder", &world));
    }

    #[test]
    fn player_level_is_at_least_comparison() {
        let mut world = build_test_world();
        assert!(evaluate("PlayerLevel:1", &world));
        assert!(!evaluate("PlayerLevel:2", &world));
        world.player.add_experience(100);
        assert!(evaluate("PlayerLevel:2", &world));
    }

    #[test]
    fn eval_has_no_side_effects() {
        let world = build_test_world();
        let before = world.player.quest_log.clone();
        evaluate("questAvailableForNPC:10", &world);
        evaluate("HasItem:300", &world);
        assert_eq!(
            world.player.quest_log.state_of(5001),
            before.state_of(5001)
        );
    }
}
