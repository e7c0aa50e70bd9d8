//! Per-tick movement outcome records.
//!
//! Every call to the hazard-avoidance resolver produces exactly one
//! [`MoveOutcome`]. Collaborators (behavior AI, combat) read these to decide
//! what the agent does next; the resolver itself never inspects them again.

use serde::{Deserialize, Serialize};

use crate::ids::AgentId;
use crate::structs::Point;

/// A single forced or voluntary relocation of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displacement {
    /// The agent that moved.
    pub agent: AgentId,
    /// Where it stood before.
    pub from: Point,
    /// Where it stands now.
    pub to: Point,
}

/// Why a hazardous agent could not move this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// No adjacent tile is both passable and safer than the current one.
    NoSaferTile,
    /// Safer tiles exist but every one is held by an agent that would not
    /// or could not vacate within the push-depth bound.
    Occupied,
}

/// Why the resolver did not evaluate escape at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleReason {
    /// The current tile does not hurt this agent.
    SafeTile,
    /// The agent is seated in a vehicle.
    VehicleExempt,
    /// The agent is committed to a multi-turn action.
    Busy,
}

/// Result of one hazard-avoidance resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum MoveOutcome {
    /// The agent escaped to a safer tile.
    Moved {
        /// The escaping agent's own move.
        step: Displacement,
        /// Agents pushed out of the way, innermost push first.
        pushed: Vec<Displacement>,
    },
    /// The agent is on a hazardous tile and stays there this tick.
    Blocked {
        /// Why no move happened.
        reason: BlockReason,
    },
    /// Hazard avoidance did not apply.
    NotApplicable {
        /// Why the agent was skipped.
        reason: IdleReason,
    },
}

impl MoveOutcome {
    /// Whether the agent changed tiles.
    pub const fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// The mover's own step, if it changed tiles.
    pub const fn step(&self) -> Option<&Displacement> {
        match self {
            Self::Moved { step, .. } => Some(step),
            Self::Blocked { .. } | Self::NotApplicable { .. } => None,
        }
    }

    /// Whether the agent was left on a hazardous tile.
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}
