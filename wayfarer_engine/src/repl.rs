//! REPL and command handling utilities.
//!
//! The game runs in a read-eval-print loop. World-affecting commands advance
//! the turn counter, which is what drives the collectible spawn scheduler;
//! every quest-relevant command reports its event to the condition tracker
//! so lifecycle states stay current without any timers.

pub mod talk;

pub use talk::talk_to_handler;

use anyhow::Result;
use colored::Colorize;
use log::info;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::command::{Command, parse_command};
use crate::item::ItemHolder;
use crate::quest::{self, GameEvent, QuestState};
use crate::save_files::{self, SaveFileStatus};
use crate::spawner;
use crate::style::GameStyle;
use crate::world::{ItemId, LocationId, MonsterId, NpcId, WayfarerWorld};

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the main read-eval-print loop until the player quits.
///
/// # Errors
/// - Propagates failures from handlers, such as a missing location for the player.
pub fn run_repl(world: &mut WayfarerWorld) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    look_handler(world)?;

    loop {
        let prompt = format!(
            "\n[Turn {} | {} gold | level {}]>> ",
            world.turn_count, world.player.gold, world.player.level
        )
        .prompt_style()
        .to_string();

        let line = match editor.readline(&prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                line
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Command canceled.".prompt_style());
                continue;
            },
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("{}", "Failed to read input. Try again.".error_style());
                info!("readline error: {err}");
                continue;
            },
        };

        match parse_command(&line) {
            Command::Look => look_handler(world)?,
            Command::Go(destination) => go_handler(world, &destination)?,
            Command::Take(item_name) => take_handler(world, &item_name)?,
            Command::Drop(item_name) => drop_handler(world, &item_name)?,
            Command::TalkTo(npc_name) => talk_to_handler(world, &mut editor, &npc_name)?,
            Command::Hunt(monster_name) => hunt_handler(world, &monster_name)?,
            Command::Inventory => inv_handler(world),
            Command::Quests => quests_handler(world),
            Command::Save(slot) => save_handler(world, &slot),
            Command::Load(slot) => load_handler(world, &slot),
            Command::ListSaves => list_saves_handler(world),
            Command::Help => help_handler(),
            Command::Quit => {
                if let ReplControl::Quit = quit_handler() {
                    break;
                }
            },
            Command::Unknown => {
                println!("{}", "Didn't quite catch that. Try 'help'.".error_style());
            },
        }
    }
    Ok(())
}

/// Advance the game turn and run the spawn scheduler tick.
fn advance_turn(world: &mut WayfarerWorld) {
    world.turn_count += 1;
    spawner::spawn_tick(world);
}

/// Print quest lifecycle changes the player should hear about.
fn report_flips(world: &WayfarerWorld, flips: &[(u32, QuestState)]) {
    for (quest_id, state) in flips {
        if state.is_ready_to_complete() {
            println!(
                "{}",
                format!("'{}' is ready to turn in.", world.quest_name(*quest_id)).event_style()
            );
        } else if state.is_active() {
            println!(
                "{}",
                format!("'{}' is no longer ready to turn in.", world.quest_name(*quest_id)).event_style()
            );
        }
    }
}

/// Handles Look commands.
pub fn look_handler(world: &WayfarerWorld) -> Result<()> {
    let location = world.player_location_ref()?;
    println!("\n{}", location.name.location_titlebar_style());
    println!("{}", location.description.description_style());

    if !location.ground_items.is_empty() {
        let mut items: Vec<(&ItemId, &u32)> = location.ground_items.iter().collect();
        items.sort_unstable_by_key(|(id, _)| **id);
        println!("{}", "You see here:".subheading_style());
        for (item_id, count) in items {
            println!("\t{} x {}", count, world.item_name(*item_id).item_style());
        }
    }
    for npc_id in &location.npcs {
        if let Some(npc) = world.npcs.get(npc_id) {
            println!("{} is here.", npc.name.npc_style());
        }
    }
    for monster_id in &location.monsters {
        if let Some(monster) = world.monsters.get(monster_id) {
            println!("A {} lurks nearby.", monster.name.monster_style());
        }
    }

    let exits: Vec<String> = location
        .exits
        .iter()
        .filter_map(|exit_id| world.locations.get(exit_id))
        .map(|exit| exit.name.clone())
        .collect();
    if !exits.is_empty() {
        println!("{} {}", "Paths lead to:".subheading_style(), exits.join(", "));
    }
    Ok(())
}

/// Handles Go(destination) commands. Movement advances the turn and fires
/// the location-entry event and on-visit spawn trigger.
pub fn go_handler(world: &mut WayfarerWorld, destination: &str) -> Result<()> {
    let current = world.player_location_ref()?;
    let query = destination.to_lowercase();
    let target: Option<LocationId> = current
        .exits
        .iter()
        .copied()
        .find(|exit_id| {
            world
                .locations
                .get(exit_id)
                .is_some_and(|exit| exit.name.to_lowercase().contains(&query))
        });

    let Some(target) = target else {
        println!("{} {}", "No path leads to".error_style(), destination);
        return Ok(());
    };

    world.player.location = target;
    if let Some(location) = world.locations.get_mut(&target) {
        location.visited = true;
    }
    info!("player moved to location {target}");

    advance_turn(world);
    let flips = quest::process_event(world, &GameEvent::LocationEntered(target));
    report_flips(world, &flips);
    spawner::on_visit(world, target);

    look_handler(world)
}

/// Handles Take(item) commands: one item moves from the ground to inventory.
pub fn take_handler(world: &mut WayfarerWorld, item_name: &str) -> Result<()> {
    let location = world.player_location_ref()?;
    let query = item_name.to_lowercase();
    let found: Option<ItemId> = location
        .ground_items
        .keys()
        .copied()
        .find(|item_id| {
            world
                .items
                .get(item_id)
                .is_some_and(|item| item.name.to_lowercase().contains(&query))
        });

    let Some(item_id) = found else {
        println!("{} {}", "There's no such thing here:".error_style(), item_name);
        return Ok(());
    };

    world.player_location_mut()?.remove_items(item_id, 1);
    world.player.add_items(item_id, 1);
    println!("You take the {}.", world.item_name(item_id).item_style());
    info!("player took 1 x item {item_id}");

    advance_turn(world);
    let flips = quest::process_event(world, &GameEvent::ItemPickedUp(item_id));
    report_flips(world, &flips);
    Ok(())
}

/// Handles Drop(item) commands: one item moves from inventory to the ground.
pub fn drop_handler(world: &mut WayfarerWorld, item_name: &str) -> Result<()> {
    let query = item_name.to_lowercase();
    let found: Option<ItemId> = world
        .player
        .inventory
        .keys()
        .copied()
        .find(|item_id| {
            world
                .items
                .get(item_id)
                .is_some_and(|item| item.name.to_lowercase().contains(&query))
        });

    let Some(item_id) = found else {
        println!("{} {}", "You aren't carrying any:".error_style(), item_name);
        return Ok(());
    };

    world.player.remove_items(item_id, 1);
    world.player_location_mut()?.add_items(item_id, 1);
    println!("You drop the {}.", world.item_name(item_id).item_style());
    info!("player dropped 1 x item {item_id}");

    advance_turn(world);
    let flips = quest::process_event(world, &GameEvent::ItemDropped(item_id));
    report_flips(world, &flips);
    Ok(())
}

/// Handles Hunt(monster) commands.
///
/// Combat resolution lives outside this engine; the hunt command reports the
/// kill so the condition tracker can count it.
pub fn hunt_handler(world: &mut WayfarerWorld, monster_name: &str) -> Result<()> {
    let location = world.player_location_ref()?;
    let query = monster_name.to_lowercase();
    let found: Option<MonsterId> = location
        .monsters
        .iter()
        .copied()
        .find(|monster_id| {
            world
                .monsters
                .get(monster_id)
                .is_some_and(|monster| monster.name.to_lowercase().contains(&query))
        });

    let Some(monster_id) = found else {
        println!("{} {}", "Nothing like that to hunt here:".error_style(), monster_name);
        return Ok(());
    };

    let monster_display = world
        .monsters
        .get(&monster_id)
        .map_or_else(|| "beast".to_string(), |m| m.name.clone());
    println!("You bring down a {}.", monster_display.monster_style());
    info!("player killed monster {monster_id}");

    advance_turn(world);
    let flips = quest::process_event(world, &GameEvent::MonsterKilled(monster_id));
    report_flips(world, &flips);
    Ok(())
}

/// Handles Inventory commands.
pub fn inv_handler(world: &WayfarerWorld) {
    println!("{}", "Inventory".subheading_style());
    if world.player.inventory.is_empty() {
        println!("\t{}", "Nothing but lint.".italic().dimmed());
    } else {
        let mut items: Vec<(&ItemId, &u32)> = world.player.inventory.iter().collect();
        items.sort_unstable_by_key(|(id, _)| **id);
        for (item_id, count) in items {
            println!("\t{} x {}", count, world.item_name(*item_id).item_style());
        }
    }
    println!("Gold: {}", world.player.gold);
}

/// Handles Quests commands: the journal of everything not still locked.
pub fn quests_handler(world: &WayfarerWorld) {
    println!("{}", "Journal".subheading_style());
    let mut quest_ids: Vec<u32> = world.player.quest_log.entries.keys().copied().collect();
    quest_ids.sort_unstable();

    let mut any_shown = false;
    for quest_id in quest_ids {
        let Some(progress) = world.player.quest_log.entries.get(&quest_id) else {
            continue;
        };
        let Some(quest) = world.quests.get(&quest_id) else {
            continue;
        };
        if progress.state.is_locked() {
            continue;
        }
        any_shown = true;

        let name = if progress.state.is_completed() {
            quest.name.quest_done_style()
        } else {
            quest.name.quest_style()
        };
        println!("{} [{}]", name, progress.state);

        if progress.state.is_active() || progress.state.is_ready_to_complete() {
            for (condition, tracker) in quest.conditions.iter().zip(progress.conditions.iter()) {
                let (current, required) = quest::progress::condition_progress(world, condition, tracker);
                println!("\t{}: {current}/{required}", describe_condition(world, condition));
            }
        }
    }
    if !any_shown {
        println!("\t{}", "Nothing yet. Go talk to someone.".italic().dimmed());
    }
}

fn describe_condition(world: &WayfarerWorld, condition: &crate::quest::QuestCondition) -> String {
    use crate::quest::QuestCondition::*;
    match condition {
        CollectItems { item, .. } => format!("Gather {}", world.item_name(*item)),
        KillMonsters { monster, .. } => format!(
            "Slay {}",
            world.monsters.get(monster).map_or("monsters", |m| m.name.as_str())
        ),
        VisitLocation { location } => format!(
            "Visit {}",
            world.locations.get(location).map_or("somewhere", |l| l.name.as_str())
        ),
        TalkToNpc { npc } => format!(
            "Speak with {}",
            world.npcs.get(npc).map_or("someone", |n| n.name.as_str())
        ),
        ReachLevel { .. } => "Reach level".to_string(),
    }
}

/// Handles Save(slot) commands.
pub fn save_handler(world: &WayfarerWorld, slot: &str) {
    let dir = save_files::save_dir_for_world(world);
    match save_files::write_save(world, &dir, slot) {
        Ok(path) => println!("Saved to {}.", path.display()),
        Err(err) => println!("{} {err:#}", "Save failed:".error_style()),
    }
}

/// Handles Load(slot) commands: replaces the running world on success.
pub fn load_handler(world: &mut WayfarerWorld, slot: &str) {
    let dir = save_files::save_dir_for_world(world);
    let entries = match save_files::build_save_entries(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            println!("{} {err:#}", "Load failed:".error_style());
            return;
        },
    };
    let Some(entry) = entries.iter().find(|entry| entry.slot == slot) else {
        println!("{} {slot}", "No such save slot:".error_style());
        return;
    };
    match &entry.status {
        SaveFileStatus::Ready => match save_files::load_save_file(&entry.path) {
            Ok(loaded) => {
                *world = loaded;
                println!("Loaded '{slot}'. Turn {}.", world.turn_count);
            },
            Err(err) => println!("{} {err:#}", "Load failed:".error_style()),
        },
        SaveFileStatus::VersionMismatch {
            save_version,
            current_version,
        } => {
            println!(
                "{} save is from engine {save_version}, this is {current_version}.",
                "Version mismatch:".error_style()
            );
        },
        SaveFileStatus::Corrupted { message } => {
            println!("{} {message}", "Save is corrupted:".error_style());
        },
    }
}

/// Handles ListSaves commands.
pub fn list_saves_handler(world: &WayfarerWorld) {
    let dir = save_files::save_dir_for_world(world);
    match save_files::build_save_entries(&dir) {
        Ok(entries) if entries.is_empty() => println!("No saves yet."),
        Ok(entries) => {
            println!("{}", "Saves".subheading_style());
            for entry in entries {
                let status = match &entry.status {
                    SaveFileStatus::Ready => "ready".to_string(),
                    SaveFileStatus::VersionMismatch { save_version, .. } => {
                        format!("engine {save_version}")
                    },
                    SaveFileStatus::Corrupted { .. } => "corrupted".to_string(),
                };
                match &entry.summary {
                    Some(summary) => println!(
                        "\t{} - {} at turn {}, {} quests underway ({status})",
                        entry.slot, summary.player_name, summary.turn_count, summary.active_quests
                    ),
                    None => println!("\t{} ({status})", entry.slot),
                }
            }
        },
        Err(err) => println!("{} {err:#}", "Couldn't list saves:".error_style()),
    }
}

/// Handles Help commands.
pub fn help_handler() {
    println!("{}", "Commands".subheading_style());
    println!("\tlook                     look around");
    println!("\tgo <place>               travel to an adjacent place");
    println!("\ttake / drop <item>       pick up or put down an item");
    println!("\ttalk to <npc>            start a conversation");
    println!("\thunt <monster>           fight a local monster");
    println!("\tinventory                what you're carrying");
    println!("\tquests                   your journal");
    println!("\tsave / load <slot>       manage saved games");
    println!("\tsaves                    list saved games");
    println!("\tquit                     leave the game");
}

/// Handles Quit commands.
pub fn quit_handler() -> ReplControl {
    println!("The road will wait for you.");
    ReplControl::Quit
}

/// Selects an NPC in the player's location by first partial name match.
pub fn select_npc(world: &WayfarerWorld, query: &str) -> Option<NpcId> {
    let location = world.player_location_ref().ok()?;
    let query = query.to_lowercase();
    location
        .npcs
        .iter()
        .copied()
        .find(|npc_id| {
            world
                .npcs
                .get(npc_id)
                .is_some_and(|npc| npc.name.to_lowercase().contains(&query))
        })
}
