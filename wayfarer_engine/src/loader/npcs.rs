//! NPC loader submodule.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use log::info;
use serde::Deserialize;

use wayfarer_data::NpcDef;

use crate::npc::Npc;
use crate::world::{NpcId, WayfarerWorld};

/// Needed to deserialize the NPC file wrapper correctly.
#[derive(Debug, Deserialize)]
struct RawNpcFile {
    npcs: Vec<NpcDef>,
}

/// Loads NPC definitions from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_npcs(json_path: &Path) -> Result<Vec<NpcDef>> {
    let contents =
        fs::read_to_string(json_path).with_context(|| format!("reading NPC data from '{}'", json_path.display()))?;
    let wrapper: RawNpcFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing NPC data from '{}'", json_path.display()))?;
    info!("{} raw NPCs loaded from '{}'", wrapper.npcs.len(), json_path.display());
    Ok(wrapper.npcs)
}

/// Builds runtime NPCs from their definitions.
pub fn build_npcs(defs: &[NpcDef]) -> HashMap<NpcId, Npc> {
    defs.iter()
        .map(|def| {
            (
                def.id,
                Npc {
                    id: def.id,
                    name: def.name.clone(),
                    description: def.desc.clone(),
                    location: def.location,
                    dialogue_id: def.dialogue.clone(),
                    quests_to_give: def.quests_to_give.clone(),
                },
            )
        })
        .collect()
}

/// Add each NPC's id to its home location.
///
/// # Errors
/// - if an NPC's home location is missing from the world
pub fn place_npcs(world: &mut WayfarerWorld) -> Result<()> {
    let placements: Vec<(NpcId, u32)> = world.npcs.values().map(|npc| (npc.id, npc.location)).collect();
    for (npc_id, location_id) in &placements {
        let location = world
            .locations
            .get_mut(location_id)
            .ok_or_else(|| anyhow!("looking up location {location_id} to place npc {npc_id}"))?;
        location.npcs.insert(*npc_id);
    }
    info!("{} NPCs placed into their home locations", placements.len());
    Ok(())
}
