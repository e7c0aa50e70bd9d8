//! Agent roster with an occupancy index.
//!
//! The [`AgentRoster`] owns every agent the simulation knows about, loaded
//! or not, and keeps a location index so "who stands here" is a map
//! lookup. Insertion order is preserved; it is the deterministic order the
//! tick cycle resolves agents in.

use std::collections::BTreeMap;

use dormant_types::{Agent, AgentId, Point};
use tracing::trace;

use crate::error::WorldError;
use crate::view::Occupancy;

/// All agents, indexed by id and by location.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    agents: BTreeMap<AgentId, Agent>,
    order: Vec<AgentId>,
    occupancy: BTreeMap<Point, AgentId>,
}

impl AgentRoster {
    /// Create an empty roster.
    pub const fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            order: Vec::new(),
            occupancy: BTreeMap::new(),
        }
    }

    /// Add an agent at its current position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateAgent`] if the id is already present
    /// and [`WorldError::TileOccupied`] if another agent stands there.
    pub fn insert(&mut self, agent: Agent) -> Result<(), WorldError> {
        if self.agents.contains_key(&agent.id) {
            return Err(WorldError::DuplicateAgent(agent.id));
        }
        if let Some(by) = self.occupancy.get(&agent.position) {
            return Err(WorldError::TileOccupied {
                at: agent.position,
                by: *by,
            });
        }
        self.occupancy.insert(agent.position, agent.id);
        self.order.push(agent.id);
        self.agents.insert(agent.id, agent);
        Ok(())
    }

    /// Remove and return an agent.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.occupancy.remove(&agent.position);
        self.order.retain(|other| *other != id);
        Some(agent)
    }

    /// Read an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Agent ids in insertion order.
    pub fn ids(&self) -> &[AgentId] {
        &self.order
    }

    /// Agents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.order.iter().filter_map(|id| self.agents.get(id))
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Occupancy for AgentRoster {
    fn occupant(&self, at: Point) -> Option<AgentId> {
        self.occupancy.get(&at).copied()
    }

    fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    fn relocate(&mut self, id: AgentId, to: Point) -> Result<Point, WorldError> {
        let agent = self.agents.get_mut(&id).ok_or(WorldError::AgentNotFound(id))?;
        let from = agent.position;
        if from == to {
            return Ok(from);
        }
        if let Some(by) = self.occupancy.get(&to) {
            return Err(WorldError::TileOccupied { at: to, by: *by });
        }
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        agent.position = to;
        trace!(agent_id = %id, %from, %to, "agent relocated");
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dormant_types::{ActivityLog, Attitude, LoadState, NeedResidue, Needs};

    use super::*;

    fn agent_at(x: i32, y: i32) -> Agent {
        Agent {
            id: AgentId::new(),
            name: format!("agent-{x}-{y}"),
            position: Point::new(x, y, 0),
            needs: Needs::default(),
            residue: NeedResidue::default(),
            activity_log: ActivityLog::new(),
            attitude: Attitude::Neutral,
            pushable: true,
            is_player: false,
            vehicle: None,
            transient: BTreeSet::new(),
            immunities: BTreeSet::new(),
            load_state: LoadState::Loaded { since: 0 },
            busy_until: None,
        }
    }

    #[test]
    fn insert_indexes_location() {
        let mut roster = AgentRoster::new();
        let agent = agent_at(1, 1);
        let id = agent.id;
        assert!(roster.insert(agent).is_ok());
        assert_eq!(roster.occupant(Point::new(1, 1, 0)), Some(id));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn shared_tile_rejected() {
        let mut roster = AgentRoster::new();
        assert!(roster.insert(agent_at(0, 0)).is_ok());
        assert!(matches!(
            roster.insert(agent_at(0, 0)),
            Err(WorldError::TileOccupied { .. })
        ));
    }

    #[test]
    fn relocate_updates_index() {
        let mut roster = AgentRoster::new();
        let agent = agent_at(0, 0);
        let id = agent.id;
        assert!(roster.insert(agent).is_ok());
        assert!(roster.insert(agent_at(2, 0)).is_ok());

        let left = roster.relocate(id, Point::new(1, 0, 0));
        assert_eq!(left.ok(), Some(Point::new(0, 0, 0)));
        assert_eq!(roster.occupant(Point::new(0, 0, 0)), None);
        assert_eq!(roster.occupant(Point::new(1, 0, 0)), Some(id));
        assert!(matches!(
            roster.relocate(id, Point::new(2, 0, 0)),
            Err(WorldError::TileOccupied { .. })
        ));
    }

    #[test]
    fn order_is_insertion_order() {
        let mut roster = AgentRoster::new();
        let first = agent_at(5, 5);
        let second = agent_at(0, 0);
        let ids = vec![first.id, second.id];
        assert!(roster.insert(first).is_ok());
        assert!(roster.insert(second).is_ok());
        assert_eq!(roster.ids(), ids.as_slice());

        assert!(roster.remove(ids[0]).is_some());
        assert_eq!(roster.ids(), &ids[1..]);
        assert_eq!(roster.occupant(Point::new(5, 5, 0)), None);
    }
}
