use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a WorldDef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a WorldDef.
///
/// Structural problems in authored content are collected here, all at once,
/// so authors see every dangling reference in a single pass. Predicate and
/// action grammar checks live with their parsers in the engine loader.
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut locations = HashSet::new();
    let mut items = HashSet::new();
    let mut monsters = HashSet::new();
    let mut npcs = HashSet::new();
    let mut quests = HashSet::new();

    track_ids(
        "location",
        world.locations.iter().map(|l| l.id),
        &mut locations,
        &mut errors,
    );
    track_ids("item", world.items.iter().map(|i| i.id), &mut items, &mut errors);
    track_ids(
        "monster",
        world.monsters.iter().map(|m| m.id),
        &mut monsters,
        &mut errors,
    );
    track_ids("npc", world.npcs.iter().map(|n| n.id), &mut npcs, &mut errors);
    track_ids("quest", world.quests.iter().map(|q| q.id), &mut quests, &mut errors);

    // Dialogue ids are strings; node id sets are kept per document for the
    // graph-integrity and quest-node checks below.
    let mut dialogues: HashMap<&str, HashSet<&str>> = HashMap::new();
    for dialogue in &world.dialogues {
        if dialogues.contains_key(dialogue.id.as_str()) {
            errors.push(ValidationError::DuplicateId {
                kind: "dialogue",
                id: dialogue.id.clone(),
            });
            continue;
        }
        let mut node_ids = HashSet::new();
        for node in &dialogue.nodes {
            if !node_ids.insert(node.id.as_str()) {
                errors.push(ValidationError::DuplicateId {
                    kind: "node",
                    id: format!("{}/{}", dialogue.id, node.id),
                });
            }
        }
        dialogues.insert(dialogue.id.as_str(), node_ids);
    }

    let ids = IdSets {
        locations: &locations,
        items: &items,
        monsters: &monsters,
        npcs: &npcs,
        quests: &quests,
    };

    check_ref(
        "location",
        world.game.player.start_location,
        ids.locations,
        "game player start location".to_string(),
        &mut errors,
    );

    for location in &world.locations {
        for exit in &location.exits {
            check_ref(
                "location",
                *exit,
                ids.locations,
                format!("location '{}' exit", location.id),
                &mut errors,
            );
        }
        for monster in &location.monsters {
            check_ref(
                "monster",
                *monster,
                ids.monsters,
                format!("location '{}' monsters", location.id),
                &mut errors,
            );
        }
    }

    let npc_dialogue: HashMap<NpcId, &str> = world.npcs.iter().map(|n| (n.id, n.dialogue.as_str())).collect();

    for npc in &world.npcs {
        check_ref(
            "location",
            npc.location,
            ids.locations,
            format!("npc '{}' location", npc.id),
            &mut errors,
        );
        if !dialogues.contains_key(npc.dialogue.as_str()) {
            errors.push(ValidationError::MissingReference {
                kind: "dialogue",
                id: npc.dialogue.clone(),
                context: format!("npc '{}'", npc.id),
            });
        }
        for quest in &npc.quests_to_give {
            check_ref(
                "quest",
                *quest,
                ids.quests,
                format!("npc '{}' quests_to_give", npc.id),
                &mut errors,
            );
        }
    }

    for quest in &world.quests {
        validate_quest(quest, &ids, &npc_dialogue, &dialogues, &mut errors);
    }

    for dialogue in &world.dialogues {
        validate_dialogue(dialogue, &dialogues, &mut errors);
    }

    errors
}

struct IdSets<'a> {
    locations: &'a HashSet<EntityId>,
    items: &'a HashSet<EntityId>,
    monsters: &'a HashSet<EntityId>,
    npcs: &'a HashSet<EntityId>,
    quests: &'a HashSet<EntityId>,
}

fn track_ids(
    kind: &'static str,
    ids: impl Iterator<Item = EntityId>,
    set: &mut HashSet<EntityId>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if !set.insert(id) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn check_ref(
    kind: &'static str,
    id: EntityId,
    set: &HashSet<EntityId>,
    context: String,
    errors: &mut Vec<ValidationError>,
) {
    if !set.contains(&id) {
        errors.push(ValidationError::MissingReference {
            kind,
            id: id.to_string(),
            context,
        });
    }
}

fn validate_quest(
    quest: &QuestDef,
    ids: &IdSets<'_>,
    npc_dialogue: &HashMap<NpcId, &str>,
    dialogues: &HashMap<&str, HashSet<&str>>,
    errors: &mut Vec<ValidationError>,
) {
    let context = format!("quest '{}'", quest.id);

    check_ref("npc", quest.giver, ids.npcs, format!("{context} giver"), errors);

    for prereq in &quest.prerequisites {
        check_ref("quest", *prereq, ids.quests, format!("{context} prerequisites"), errors);
        if *prereq == quest.id {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} lists itself as a prerequisite"),
            });
        }
    }

    for condition in &quest.conditions {
        match condition {
            QuestConditionDef::CollectItems { item, required, spawns } => {
                check_ref("item", *item, ids.items, format!("{context} collect condition"), errors);
                if *required == 0 {
                    errors.push(ValidationError::InvalidValue {
                        context: format!("{context} collect condition requires 0 items"),
                    });
                }
                for spawn in spawns {
                    validate_spawn(spawn, quest.id, ids, errors);
                }
            },
            QuestConditionDef::KillMonsters { monster, required } => {
                check_ref(
                    "monster",
                    *monster,
                    ids.monsters,
                    format!("{context} kill condition"),
                    errors,
                );
                if *required == 0 {
                    errors.push(ValidationError::InvalidValue {
                        context: format!("{context} kill condition requires 0 kills"),
                    });
                }
            },
            QuestConditionDef::VisitLocation { location } => {
                check_ref(
                    "location",
                    *location,
                    ids.locations,
                    format!("{context} visit condition"),
                    errors,
                );
            },
            QuestConditionDef::TalkToNpc { npc } => {
                check_ref("npc", *npc, ids.npcs, format!("{context} talk condition"), errors);
            },
            QuestConditionDef::ReachLevel { level } => {
                if *level == 0 {
                    errors.push(ValidationError::InvalidValue {
                        context: format!("{context} level condition requires level 0"),
                    });
                }
            },
        }
    }

    for reward in &quest.rewards.items {
        check_ref("item", reward.item, ids.items, format!("{context} rewards"), errors);
        if reward.quantity == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("{context} rewards item '{}' with quantity 0", reward.item),
            });
        }
    }

    // Each lifecycle node must exist in the giver's dialogue document, or
    // the resolver has nowhere to route the conversation.
    if let Some(dialogue_id) = npc_dialogue.get(&quest.giver)
        && let Some(node_ids) = dialogues.get(dialogue_id)
    {
        let nodes = &quest.dialogue_nodes;
        for (label, node) in [
            ("offer", &nodes.offer),
            ("in_progress", &nodes.in_progress),
            ("ready_to_complete", &nodes.ready_to_complete),
            ("completed", &nodes.completed),
        ] {
            if !node_ids.contains(node.as_str()) {
                errors.push(ValidationError::MissingReference {
                    kind: "node",
                    id: node.clone(),
                    context: format!("{context} {label} node in dialogue '{dialogue_id}'"),
                });
            }
        }
    }
}

fn validate_spawn(spawn: &SpawnDataDef, quest_id: QuestId, ids: &IdSets<'_>, errors: &mut Vec<ValidationError>) {
    let context = format!("quest '{quest_id}' spawn data");
    check_ref("location", spawn.location, ids.locations, context.clone(), errors);
    if !(1..=100).contains(&spawn.chance) {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context}: chance {} outside 1-100", spawn.chance),
        });
    }
    if spawn.quantity == 0 || spawn.max_on_location == 0 {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context}: zero quantity or location cap"),
        });
    }
    if spawn.interval == 0 {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context}: zero spawn interval"),
        });
    }
}

fn validate_dialogue(
    dialogue: &DialogueDef,
    dialogues: &HashMap<&str, HashSet<&str>>,
    errors: &mut Vec<ValidationError>,
) {
    let Some(node_ids) = dialogues.get(dialogue.id.as_str()) else {
        return; // duplicate id already reported
    };

    if !node_ids.contains(dialogue.start.as_str()) {
        errors.push(ValidationError::MissingReference {
            kind: "node",
            id: dialogue.start.clone(),
            context: format!("dialogue '{}' start node", dialogue.id),
        });
    }

    for node in &dialogue.nodes {
        for response in &node.responses {
            if !response.target.is_empty() && !node_ids.contains(response.target.as_str()) {
                errors.push(ValidationError::MissingReference {
                    kind: "node",
                    id: response.target.clone(),
                    context: format!("dialogue '{}' node '{}' response target", dialogue.id, node.id),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: LocationId) -> LocationDef {
        LocationDef {
            id,
            name: format!("Location {id}"),
            desc: "Test location".into(),
            exits: Vec::new(),
            monsters: Vec::new(),
        }
    }

    fn dialogue(id: &str, nodes: Vec<NodeDef>) -> DialogueDef {
        DialogueDef {
            id: id.to_string(),
            name: format!("Dialogue {id}"),
            start: "greeting".into(),
            nodes,
        }
    }

    fn node(id: &str, targets: &[&str]) -> NodeDef {
        NodeDef {
            id: id.to_string(),
            text: format!("Node {id} text"),
            kind: String::new(),
            responses: targets
                .iter()
                .map(|t| ResponseDef {
                    text: "Say something".into(),
                    target: (*t).to_string(),
                    condition: String::new(),
                    actions: Vec::new(),
                })
                .collect(),
        }
    }

    fn base_world() -> WorldDef {
        WorldDef {
            game: GameDef {
                title: "Demo".into(),
                player: PlayerDef {
                    name: "Hero".into(),
                    start_location: 1,
                    ..PlayerDef::default()
                },
                ..GameDef::default()
            },
            locations: vec![location(1)],
            dialogues: vec![dialogue("village_elder", vec![node("greeting", &[])])],
            npcs: vec![NpcDef {
                id: 10,
                name: "Elder".into(),
                desc: String::new(),
                location: 1,
                dialogue: "village_elder".into(),
                quests_to_give: Vec::new(),
            }],
            ..WorldDef::default()
        }
    }

    fn quest(id: QuestId, giver: NpcId) -> QuestDef {
        QuestDef {
            id,
            name: format!("Quest {id}"),
            giver,
            conditions: Vec::new(),
            prerequisites: Vec::new(),
            rewards: RewardsDef::default(),
            dialogue_nodes: QuestNodesDef {
                offer: "greeting".into(),
                in_progress: "greeting".into(),
                ready_to_complete: "greeting".into(),
                completed: "greeting".into(),
            },
        }
    }

    #[test]
    fn valid_world_has_no_errors() {
        let mut world = base_world();
        world.quests = vec![quest(5001, 10)];
        world.npcs[0].quests_to_give = vec![5001];
        assert!(validate_world(&world).is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let mut world = base_world();
        world.locations = vec![location(1), location(1)];

        let errors = validate_world(&world);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::DuplicateId { kind, id } if *kind == "location" && id == "1"))
        );
    }

    #[test]
    fn dangling_response_target_is_reported() {
        let mut world = base_world();
        world.dialogues = vec![dialogue("village_elder", vec![node("greeting", &["no_such_node"])])];

        let errors = validate_world(&world);
        assert!(errors.iter().any(
            |err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "node" && id == "no_such_node")
        ));
    }

    #[test]
    fn empty_response_target_is_end_of_dialogue_not_error() {
        let mut world = base_world();
        world.dialogues = vec![dialogue("village_elder", vec![node("greeting", &[""])])];
        assert!(validate_world(&world).is_empty());
    }

    #[test]
    fn missing_prerequisite_quest_is_reported() {
        let mut world = base_world();
        let mut q = quest(5001, 10);
        q.prerequisites = vec![4999];
        world.quests = vec![q];
        world.npcs[0].quests_to_give = vec![5001];

        let errors = validate_world(&world);
        assert!(errors.iter().any(
            |err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "quest" && id == "4999")
        ));
    }

    #[test]
    fn spawn_chance_out_of_range_is_reported() {
        let mut world = base_world();
        world.items = vec![ItemDef {
            id: 300,
            name: "Widget".into(),
            desc: String::new(),
        }];
        let mut q = quest(5001, 10);
        q.conditions = vec![QuestConditionDef::CollectItems {
            item: 300,
            required: 5,
            spawns: vec![SpawnDataDef {
                location: 1,
                chance: 150,
                quantity: 1,
                max_on_location: 3,
                interval: 4,
            }],
        }];
        world.quests = vec![q];
        world.npcs[0].quests_to_give = vec![5001];

        let errors = validate_world(&world);
        assert!(
            errors
                .iter()
                .any(|err| matches!(err, ValidationError::InvalidValue { context } if context.contains("chance")))
        );
    }

    #[test]
    fn quest_node_missing_from_giver_dialogue_is_reported() {
        let mut world = base_world();
        let mut q = quest(5001, 10);
        q.dialogue_nodes.offer = "quest_5001_offer".into();
        world.quests = vec![q];
        world.npcs[0].quests_to_give = vec![5001];

        let errors = validate_world(&world);
        assert!(errors.iter().any(
            |err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "node" && id == "quest_5001_offer")
        ));
    }

    #[test]
    fn missing_start_node_is_reported() {
        let mut world = base_world();
        world.dialogues = vec![DialogueDef {
            start: "nowhere".into(),
            ..dialogue("village_elder", vec![node("greeting", &[])])
        }];

        let errors = validate_world(&world);
        assert!(errors.iter().any(
            |err| matches!(err, ValidationError::MissingReference { kind, id, .. } if *kind == "node" && id == "nowhere")
        ));
    }
}
