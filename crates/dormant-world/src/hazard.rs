//! Hazard classification, vehicle exemption, and footing.
//!
//! [`TileHazard`] is the side-effect-free snapshot a [`HazardView`] returns
//! for one location. Whether that tile is hazardous depends on the agent
//! asking: fields an agent is immune to contribute nothing.
//!
//! [`HazardView`]: crate::view::HazardView

use std::collections::BTreeSet;

use dormant_types::{Agent, FieldKind, TransientStatus};
use serde::{Deserialize, Serialize};

use crate::tile::{Field, Tile};

/// Hazard-relevant flags of one tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileHazard {
    /// Fields present on the tile.
    pub fields: Vec<Field>,
    /// Standing here confers unstable footing.
    pub unstable: bool,
    /// Agents can stand here.
    pub passable: bool,
    /// A vehicle seat can be boarded here.
    pub boardable: bool,
}

impl TileHazard {
    /// Snapshot the hazard flags of `tile`.
    pub fn of(tile: &Tile) -> Self {
        Self {
            fields: tile.fields.clone(),
            unstable: tile.is_unstable(),
            passable: tile.is_passable(),
            boardable: tile.is_boardable(),
        }
    }

    /// Summed danger of every field the holder of `immunities` is not
    /// immune to. Zero means safe.
    pub fn danger_for(&self, immunities: &BTreeSet<FieldKind>) -> u32 {
        self.fields
            .iter()
            .filter(|field| !immunities.contains(&field.kind))
            .fold(0_u32, |total, field| total.saturating_add(field.danger()))
    }

    /// Whether this tile harms `agent`.
    pub fn is_hazardous_for(&self, agent: &Agent) -> bool {
        self.danger_for(&agent.immunities) > 0
    }
}

/// Whether `agent` is seated in a vehicle and therefore ignores terrain
/// hazards. Reads no tile data.
pub const fn is_vehicle_exempt(agent: &Agent) -> bool {
    agent.vehicle.is_some()
}

/// The footing status a tile confers, if any.
pub const fn footing_status(tile: &TileHazard) -> Option<TransientStatus> {
    if tile.unstable {
        Some(TransientStatus::UnstableFooting)
    } else {
        None
    }
}

/// Recompute `agent`'s footing strictly from `tile`. Missing tile data
/// confers nothing. Returns `true` if the status set changed.
pub fn refresh_footing(agent: &mut Agent, tile: Option<&TileHazard>) -> bool {
    match tile.and_then(footing_status) {
        Some(status) => agent.transient.insert(status),
        None => agent.transient.remove(&TransientStatus::UnstableFooting),
    }
}
