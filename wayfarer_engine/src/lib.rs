#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const WAYFARER_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod command;
pub mod data_paths;
pub mod dialogue;
pub mod item;
pub mod loader;
pub mod location;
pub mod monster;
pub mod npc;
pub mod player;
pub mod quest;
pub mod repl;
pub mod save_files;
pub mod spawner;
pub mod style;
pub mod world;

// Re-exports for convenience
pub use dialogue::{DialogueDoc, DialogueNode, Response};
pub use item::{Item, ItemHolder};
pub use loader::load_world;
pub use location::Location;
pub use npc::Npc;
pub use player::Player;
pub use quest::{Quest, QuestLog, QuestState};
pub use repl::run_repl;
pub use world::WayfarerWorld;
