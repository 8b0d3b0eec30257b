//! Loader utilities for building a `WayfarerWorld` from authored content.
//!
//! Content lives in JSON files (one per kind) plus a `game.toml` with
//! game-level configuration. Loading is two-stage: deserialize everything
//! into the `wayfarer_data` definition structs, validate the whole set at
//! once so authors see every problem in one pass, then build the runtime
//! world.

pub mod config;
pub mod dialogues;
pub mod items;
pub mod locations;
pub mod monsters;
pub mod npcs;
pub mod quests;

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use wayfarer_data::WorldDef;

use crate::data_paths::data_path;
use crate::dialogue::{DialogueCommand, Predicate};
use crate::quest::seed_quest_log;
use crate::world::WayfarerWorld;

/// Load the `WayfarerWorld` from the default data directory.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, validation, or missing
/// references.
pub fn load_world() -> Result<WayfarerWorld> {
    load_world_from(&data_path(""))
}

/// Load the `WayfarerWorld` from content files in `dir`.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or validation.
pub fn load_world_from(dir: &Path) -> Result<WayfarerWorld> {
    let game = config::load_game_config(&dir.join("game.toml")).context("while loading game config")?;
    let worlddef = WorldDef {
        game,
        locations: locations::load_raw_locations(&dir.join("locations.json"))?,
        items: items::load_raw_items(&dir.join("items.json"))?,
        monsters: monsters::load_raw_monsters(&dir.join("monsters.json"))?,
        npcs: npcs::load_raw_npcs(&dir.join("npcs.json"))?,
        quests: quests::load_raw_quests(&dir.join("quests.json"))?,
        dialogues: dialogues::load_raw_dialogues(&dir.join("dialogues.json"))?,
    };

    validate_worlddef(&worlddef)?;
    let world = build_world_from_def(&worlddef).context("while building world from definitions")?;
    Ok(world)
}

/// Validate the assembled WorldDef and return a single aggregated error.
///
/// Structural checks come from `wayfarer_data`; on top of those, every
/// response condition and action is run through the predicate/action
/// parsers so grammar mistakes surface here instead of silently hiding
/// content during play.
pub fn validate_worlddef(def: &WorldDef) -> Result<()> {
    let mut errors: Vec<String> = wayfarer_data::validate_world(def)
        .into_iter()
        .map(|err| err.to_string())
        .collect();

    for dialogue in &def.dialogues {
        for node in &dialogue.nodes {
            for response in &node.responses {
                let condition = response.condition.trim();
                if !condition.is_empty()
                    && let Err(err) = Predicate::parse(condition)
                {
                    errors.push(format!(
                        "dialogue '{}' node '{}': condition {err}",
                        dialogue.id, node.id
                    ));
                }
                for action in &response.actions {
                    if let Err(err) = DialogueCommand::parse(action) {
                        errors.push(format!("dialogue '{}' node '{}': action {err}", dialogue.id, node.id));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        return Ok(());
    }
    let details = errors.into_iter().map(|err| format!("- {err}")).collect::<Vec<_>>().join("\n");
    bail!("world content validation failed:\n{details}");
}

/// Convert a validated `WorldDef` into a populated `WayfarerWorld`.
///
/// # Errors
/// - on missing cross-references that slipped past validation
pub fn build_world_from_def(def: &WorldDef) -> Result<WayfarerWorld> {
    let mut world = WayfarerWorld::new_empty();

    world.game_title = def.game.title.clone();
    world.world_slug = if def.game.slug.trim().is_empty() {
        crate::save_files::sanitize_slug(&def.game.title)
    } else {
        def.game.slug.clone()
    };
    world.intro = def.game.intro.clone();

    world.locations = locations::build_locations(&def.locations);
    info!("{} locations added to WayfarerWorld", world.locations.len());

    world.items = items::build_items(&def.items);
    info!("{} items added to WayfarerWorld", world.items.len());

    world.monsters = monsters::build_monsters(&def.monsters);
    info!("{} monsters added to WayfarerWorld", world.monsters.len());

    world.npcs = npcs::build_npcs(&def.npcs);
    info!("{} NPCs added to WayfarerWorld", world.npcs.len());

    world.dialogues = dialogues::build_dialogues(&def.dialogues);
    info!("{} dialogues added to WayfarerWorld", world.dialogues.len());

    world.quests = quests::build_quests(&def.quests);
    info!("{} quests added to WayfarerWorld", world.quests.len());

    world.player = config::build_player(&def.game.player);
    seed_quest_log(&mut world);

    npcs::place_npcs(&mut world)?;
    monsters::place_monsters(&mut world, &def.locations)?;

    let start = world.player.location;
    match world.locations.get_mut(&start) {
        Some(location) => location.visited = true,
        None => bail!("player start location {start} not found in world"),
    }

    dialogues::warn_unreachable_nodes(&world);

    Ok(world)
}
