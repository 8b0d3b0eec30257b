//! Monster loader submodule.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Deserialize;

use wayfarer_data::{LocationDef, MonsterDef};

use crate::monster::Monster;
use crate::world::{MonsterId, WayfarerWorld};

#[derive(Debug, Deserialize)]
struct RawMonsterFile {
    monsters: Vec<MonsterDef>,
}

/// Loads monster definitions from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_monsters(json_path: &Path) -> Result<Vec<MonsterDef>> {
    let contents = fs::read_to_string(json_path)
        .with_context(|| format!("reading monster data from '{}'", json_path.display()))?;
    let wrapper: RawMonsterFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing monster data from '{}'", json_path.display()))?;
    info!("{} raw monsters loaded from '{}'", wrapper.monsters.len(), json_path.display());
    Ok(wrapper.monsters)
}

/// Builds the runtime monster catalog from its definitions.
pub fn build_monsters(defs: &[MonsterDef]) -> HashMap<MonsterId, Monster> {
    defs.iter()
        .map(|def| {
            (
                def.id,
                Monster {
                    id: def.id,
                    name: def.name.clone(),
                },
            )
        })
        .collect()
}

/// Add each location's resident monsters to the built world.
///
/// # Errors
/// - if a location definition names a location missing from the world
pub fn place_monsters(world: &mut WayfarerWorld, location_defs: &[LocationDef]) -> Result<()> {
    let mut placed = 0;
    for def in location_defs {
        let location = world
            .locations
            .get_mut(&def.id)
            .ok_or_else(|| anyhow!("location {} vanished between build and placement", def.id))?;
        for monster_id in &def.monsters {
            location.monsters.insert(*monster_id);
            placed += 1;
        }
    }
    info!("{placed} monsters placed into their locations");
    Ok(())
}
