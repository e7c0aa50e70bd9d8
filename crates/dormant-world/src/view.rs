//! Collaborator traits the movement and targeting code reads the world
//! through.
//!
//! Nothing in the resolver touches a concrete map or roster. A test can
//! implement these over a handful of hard-coded tiles.

use dormant_types::{Agent, AgentId, Point};

use crate::error::WorldError;
use crate::hazard::TileHazard;

/// Side-effect-free tile hazard lookup.
pub trait HazardView {
    /// Hazard snapshot at `at`, or `None` if the location is unknown.
    /// Unknown locations are treated as impassable.
    fn hazard_at(&self, at: Point) -> Option<TileHazard>;
}

/// Line-of-sight query between two map locations.
pub trait LineOfSight {
    /// Whether an observer at `from` can see `to`.
    fn has_line_of_sight(&self, from: Point, to: Point) -> bool;
}

/// Agent-at-location lookup plus the move mutator.
pub trait Occupancy {
    /// The agent standing at `at`, if any.
    fn occupant(&self, at: Point) -> Option<AgentId>;

    /// Read an agent.
    fn agent(&self, id: AgentId) -> Option<&Agent>;

    /// Mutate an agent's status. Position changes must go through
    /// [`Occupancy::relocate`] so the occupancy index stays in sync.
    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent>;

    /// Move `id` to `to` and return the point it left.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] for an unknown agent and
    /// [`WorldError::TileOccupied`] if another agent stands at `to`.
    fn relocate(&mut self, id: AgentId, to: Point) -> Result<Point, WorldError>;
}
