//! Location loader submodule.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use wayfarer_data::LocationDef;

use crate::location::Location;
use crate::world::LocationId;

/// Needed to deserialize the location file wrapper correctly.
#[derive(Debug, Deserialize)]
struct RawLocationFile {
    locations: Vec<LocationDef>,
}

/// Loads location definitions from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_locations(json_path: &Path) -> Result<Vec<LocationDef>> {
    let contents = fs::read_to_string(json_path)
        .with_context(|| format!("reading location data from '{}'", json_path.display()))?;
    let wrapper: RawLocationFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing location data from '{}'", json_path.display()))?;
    info!("{} raw locations loaded from '{}'", wrapper.locations.len(), json_path.display());
    Ok(wrapper.locations)
}

/// Builds runtime locations from their definitions.
pub fn build_locations(defs: &[LocationDef]) -> HashMap<LocationId, Location> {
    defs.iter()
        .map(|def| {
            (
                def.id,
                Location {
                    id: def.id,
                    name: def.name.clone(),
                    description: def.desc.clone(),
                    exits: def.exits.clone(),
                    npcs: std::collections::HashSet::new(),
                    monsters: std::collections::HashSet::new(),
                    ground_items: HashMap::new(),
                    visited: false,
                },
            )
        })
        .collect()
}
