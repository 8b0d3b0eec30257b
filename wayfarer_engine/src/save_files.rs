//! Save-game discovery and serialization helpers.
//!
//! Saves are RON snapshots of the whole [`WayfarerWorld`], so quest states,
//! condition counters, ground-item counts, and flags all survive together.
//! File names carry the engine version for mismatch detection on load.

use crate::{WAYFARER_VERSION, WayfarerWorld};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const SAVE_DIR: &str = "saved_games";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub world_title: String,
    pub player_name: String,
    pub turn_count: usize,
    pub active_quests: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveFileStatus {
    Ready,
    VersionMismatch { save_version: String, current_version: String },
    Corrupted { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFileEntry {
    pub slot: String,
    pub version: String,
    pub path: PathBuf,
    pub file_name: String,
    pub modified: Option<SystemTime>,
    pub summary: Option<SaveSummary>,
    pub status: SaveFileStatus,
}

/// Reduce a display name to a filesystem-friendly slug.
pub fn sanitize_slug(raw: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = true;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() { "world".to_string() } else { slug }
}

/// Compute the save directory for a world.
pub fn save_dir_for_world(world: &WayfarerWorld) -> PathBuf {
    let raw = if world.world_slug.trim().is_empty() {
        world.game_title.as_str()
    } else {
        world.world_slug.as_str()
    };
    PathBuf::from(SAVE_DIR).join(sanitize_slug(raw))
}

/// Serialize the world into a save slot file under `dir`.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file cannot
/// be written or serialized.
pub fn write_save(world: &WayfarerWorld, dir: &Path, slot: &str) -> Result<PathBuf> {
    let slot = sanitize_slug(slot);
    fs::create_dir_all(dir).with_context(|| format!("creating save directory {}", dir.display()))?;
    let path = dir.join(format!("{slot}-wayfarer-{WAYFARER_VERSION}.ron"));
    let serialized = ron::ser::to_string(world).context("serializing world state")?;
    fs::write(&path, serialized).with_context(|| format!("writing save file {}", path.display()))?;
    info!("world saved to '{}'", path.display());
    Ok(path)
}

/// Load a save file from disk and deserialize its world state.
///
/// # Errors
/// Returns an error if the file cannot be read or deserialized.
pub fn load_save_file(path: &Path) -> Result<WayfarerWorld> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading save file {}", path.display()))?;
    ron::from_str::<WayfarerWorld>(&raw).with_context(|| format!("parsing save file {}", path.display()))
}

/// Discover save slot files stored in `dir`.
///
/// # Errors
/// Returns an error if the directory contents cannot be read or enumerated.
pub fn collect_save_slots(dir: &Path) -> Result<Vec<SaveSlot>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry.with_context(|| format!("enumerating {}", dir.display()))?;
        if let Some(slot) = slot_from_entry(&entry) {
            slots.push(slot);
        }
    }
    slots.sort_by(|a, b| a.slot.cmp(&b.slot).then(a.version.cmp(&b.version)));
    Ok(slots)
}

/// Build descriptive entries for save files located in `dir`.
///
/// # Errors
/// Returns an error if reading the directory fails.
pub fn build_save_entries(dir: &Path) -> Result<Vec<SaveFileEntry>> {
    let slots = collect_save_slots(dir)?;
    let mut entries: Vec<_> = slots.into_iter().map(entry_for_slot).collect();
    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.slot.cmp(&b.slot)));
    Ok(entries)
}

/// Build a full [`SaveFileEntry`] from a discovered save slot.
fn entry_for_slot(slot: SaveSlot) -> SaveFileEntry {
    let mut version = slot.version.clone();
    let (summary, status) = match fs::read_to_string(&slot.path) {
        Ok(raw) => match ron::from_str::<WayfarerWorld>(&raw) {
            Ok(world) => {
                version.clone_from(&world.version);
                let status = if world.version == WAYFARER_VERSION {
                    SaveFileStatus::Ready
                } else {
                    SaveFileStatus::VersionMismatch {
                        save_version: world.version.clone(),
                        current_version: WAYFARER_VERSION.to_string(),
                    }
                };
                let summary = SaveSummary {
                    world_title: world.game_title.clone(),
                    player_name: world.player.name.clone(),
                    turn_count: world.turn_count,
                    active_quests: world.player.quest_log.active_quests().len(),
                };
                (Some(summary), status)
            },
            Err(err) => {
                warn!("failed to parse save '{}' ({}): {}", slot.slot, slot.path.display(), err);
                (
                    None,
                    SaveFileStatus::Corrupted {
                        message: format!("parse error: {err}"),
                    },
                )
            },
        },
        Err(err) => {
            warn!("failed to read save '{}' ({}): {}", slot.slot, slot.path.display(), err);
            (
                None,
                SaveFileStatus::Corrupted {
                    message: format!("read error: {err}"),
                },
            )
        },
    };

    SaveFileEntry {
        slot: slot.slot,
        version,
        path: slot.path,
        file_name: slot.file_name,
        modified: slot.modified,
        summary,
        status,
    }
}

fn slot_from_entry(entry: &fs::DirEntry) -> Option<SaveSlot> {
    let path = entry.path();
    if !path.is_file() {
        return None;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("ron") {
        return None;
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?.to_string();
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    let (slot, version) = stem.rsplit_once("-wayfarer-")?;
    if slot.is_empty() {
        return None;
    }
    let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
    Some(SaveSlot {
        slot: slot.to_string(),
        version: version.to_string(),
        path,
        file_name,
        modified,
    })
}
