//! Monster catalog entries.
//!
//! Combat resolution is an external collaborator; the engine only needs
//! monsters as named targets for kill-condition tracking.

use serde::{Deserialize, Serialize};

use crate::world::MonsterId;

/// A monster as defined by content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
}
