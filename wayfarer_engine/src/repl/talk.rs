//! `repl::talk` module
//!
//! The conversation loop: present the current node, list visible responses,
//! read a choice, apply it, repeat until the session ends or the player
//! walks away.

use anyhow::Result;
use colored::Colorize;
use log::info;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::dialogue::DialogueSession;
use crate::style::GameStyle;
use crate::world::WayfarerWorld;

use super::{advance_turn, select_npc};

/// Handles TalkTo(npc) commands.
///
/// # Errors
/// - Propagates failures resolving the NPC's dialogue document.
pub fn talk_to_handler(world: &mut WayfarerWorld, editor: &mut DefaultEditor, npc_name: &str) -> Result<()> {
    let Some(npc_id) = select_npc(world, npc_name) else {
        println!("{} {}", "Nobody by that name here:".error_style(), npc_name);
        return Ok(());
    };
    let npc_display = world.npcs.get(&npc_id).map_or_else(String::new, |npc| npc.name.clone());

    // Talking takes a turn like any other act.
    advance_turn(world);

    let (mut session, opening_messages) = DialogueSession::begin(world, npc_id)?;
    for message in &opening_messages {
        println!("{}", message.event_style());
    }
    info!("player talking to npc {npc_id} ('{npc_display}')");

    while !session.is_over() {
        let Some(node) = session.current_node(world) else {
            break;
        };
        let width = textwrap::termwidth().min(80);
        println!("\n{}: {}", npc_display.npc_style(), textwrap::fill(&node.text, width).dialogue_style());

        let visible = session.visible_responses(world);
        if visible.is_empty() {
            println!("{}", "There's nothing more to say.".italic().dimmed());
            session.abandon();
            break;
        }
        for (shown, (_, response)) in visible.iter().enumerate() {
            println!("  {}) {}", shown + 1, response.text);
        }
        println!("  0) [walk away]");

        let line = match editor.readline(&"choice> ".prompt_style().to_string()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                session.abandon();
                break;
            },
            Err(_) => continue,
        };

        let Ok(choice) = line.trim().parse::<usize>() else {
            println!("{}", "Pick a number from the list.".error_style());
            continue;
        };
        if choice == 0 {
            session.abandon();
            break;
        }
        let Some((original_index, _)) = visible.get(choice - 1).copied() else {
            println!("{}", "Pick a number from the list.".error_style());
            continue;
        };

        let outcome = session.choose(world, original_index)?;
        for message in &outcome.messages {
            println!("{}", message.event_style());
        }
        if outcome.trade_requested {
            // trading is handled by a collaborator this build doesn't ship
            let notice = format!("{npc_display} has nothing to trade today.");
            println!("{}", notice.as_str().italic().dimmed());
        }
    }
    Ok(())
}
