//! Game configuration loader (`game.toml`).

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;

use wayfarer_data::{GameDef, PlayerDef};

use crate::player::{Player, level_for_experience};

/// Load game-level metadata and the starting player definition from TOML.
///
/// # Errors
/// - on failed read of the file or a parse error
pub fn load_game_config(toml_path: &Path) -> Result<GameDef> {
    let contents = fs::read_to_string(toml_path)
        .with_context(|| format!("reading game config from '{}'", toml_path.display()))?;
    let game: GameDef = toml::from_str(&contents)
        .with_context(|| format!("parsing game config from '{}'", toml_path.display()))?;
    info!("game config loaded: '{}'", game.title);
    Ok(game)
}

/// Build the starting player from its definition.
pub fn build_player(def: &PlayerDef) -> Player {
    Player {
        name: def.name.clone(),
        location: def.start_location,
        gold: def.gold,
        experience: def.experience,
        level: level_for_experience(def.experience),
        ..Player::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_player_derives_level_from_experience() {
        let def = PlayerDef {
            name: "Tester".into(),
            start_location: 3,
            gold: 5,
            experience: 220,
        };
        let player = build_player(&def);
        assert_eq!(player.location, 3);
        assert_eq!(player.level, 3);
        assert!(player.inventory.is_empty());
        assert!(player.quest_log.entries.is_empty());
    }
}
