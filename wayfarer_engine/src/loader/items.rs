//! Item loader submodule.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use wayfarer_data::ItemDef;

use crate::item::Item;
use crate::world::ItemId;

#[derive(Debug, Deserialize)]
struct RawItemFile {
    items: Vec<ItemDef>,
}

/// Loads item definitions from file.
///
/// # Errors
/// - on failed read or parse of the file
pub fn load_raw_items(json_path: &Path) -> Result<Vec<ItemDef>> {
    let contents =
        fs::read_to_string(json_path).with_context(|| format!("reading item data from '{}'", json_path.display()))?;
    let wrapper: RawItemFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing item data from '{}'", json_path.display()))?;
    info!("{} raw items loaded from '{}'", wrapper.items.len(), json_path.display());
    Ok(wrapper.items)
}

/// Builds the runtime item catalog from its definitions.
pub fn build_items(defs: &[ItemDef]) -> HashMap<ItemId, Item> {
    defs.iter()
        .map(|def| {
            (
                def.id,
                Item {
                    id: def.id,
                    name: def.name.clone(),
                    description: def.desc.clone(),
                },
            )
        })
        .collect()
}
