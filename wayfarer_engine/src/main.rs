#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Wayfarer **
//! Text RPG engine project

use wayfarer_engine::style::GameStyle;
use wayfarer_engine::{load_world, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;

use log::info;

use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading Wayfarer world...");
    let mut world = load_world().context("while loading WayfarerWorld")?;
    info!("WayfarerWorld loaded successfully.");

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;
    info!("Starting the game!");

    let title = world.game_title.to_uppercase();
    println!("{:^84}", title.as_str().bright_yellow().underline());
    println!("\nYou are {}.\n", world.player.name.as_str().bold().bright_blue());

    if !world.intro.is_empty() {
        println!("{}\n", world.intro.description_style());
    }

    run_repl(&mut world)
}
