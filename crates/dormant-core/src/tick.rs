//! Tick cycle: the per-turn loop that drives the Dormant simulation.
//!
//! Each call to [`Simulation::run_tick`] simulates the clock's current turn
//! in three phases and then advances the clock:
//!
//! 1. **Needs** -- apply one turn of need mechanics to every loaded agent.
//! 2. **Movement** -- resolve hazard avoidance for every loaded agent in
//!    roster order. Moves are committed immediately, so later agents (and
//!    their push chains) see earlier agents' new positions.
//! 3. **Targeting** -- record what each hostile agent would engage.
//!
//! Unloaded agents are skipped entirely. Their needs are caught up in one
//! step when [`Simulation::load_agent`] brings them back.
//!
//! The tick cycle is deterministic given the same initial state.

use std::collections::BTreeMap;

use dormant_agents::{
    AgentError, AgentManager, CatchUpReport, LoggedActivity, metabolism, vitals,
};
use dormant_types::{Agent, AgentId, MoveOutcome, Point, Turn};
use dormant_world::{AgentRoster, Occupancy, TileMap, WorldError};
use tracing::{debug, info};

use crate::clock::{ClockError, WorldClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::movement::{MovementError, MovementResolver};
use crate::targeting::select_target;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The configuration was rejected.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// An agent need or load computation failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Movement resolution failed.
    #[error("movement error: {source}")]
    Movement {
        /// The underlying movement error.
        #[from]
        source: MovementError,
    },

    /// A roster operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The agent is not in the roster.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The turn that was simulated.
    pub turn: Turn,
    /// Number of loaded agents whose needs advanced.
    pub needs_updated: usize,
    /// Movement outcome for each loaded agent, in resolution order.
    pub outcomes: Vec<(AgentId, MoveOutcome)>,
    /// Target chosen by each hostile agent that found one.
    pub targets: BTreeMap<AgentId, AgentId>,
}

impl TickSummary {
    /// The outcome recorded for `id`, if it was resolved this tick.
    pub fn outcome_for(&self, id: AgentId) -> Option<&MoveOutcome> {
        self.outcomes
            .iter()
            .find(|(agent, _)| *agent == id)
            .map(|(_, outcome)| outcome)
    }
}

/// The mutable simulation state driven by the tick cycle.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    clock: WorldClock,
    map: TileMap,
    roster: AgentRoster,
    resolver: MovementResolver,
}

impl Simulation {
    /// Create a simulation at turn 0.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Config`] if `config` fails validation and
    /// [`TickError::Clock`] if the clock cannot be built from it.
    pub fn new(
        config: SimulationConfig,
        map: TileMap,
        roster: AgentRoster,
    ) -> Result<Self, TickError> {
        config.validate()?;
        let clock = WorldClock::new(&config.time)?;
        let resolver = MovementResolver::new(config.movement);
        info!(
            agents = roster.len(),
            tiles = map.len(),
            max_push_depth = config.movement.max_push_depth,
            "simulation created"
        );
        Ok(Self {
            config,
            clock,
            map,
            roster,
            resolver,
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The world clock.
    pub const fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// The tile grid.
    pub const fn map(&self) -> &TileMap {
        &self.map
    }

    /// Mutable access to the tile grid (fields spreading, rubble falling).
    pub const fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    /// All agents.
    pub const fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    /// Read one agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.roster.get(id)
    }

    /// Mutate one agent's state. Change its position with
    /// [`Simulation::relocate`] so the occupancy index stays in sync.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.roster.agent_mut(id)
    }

    /// Add an agent at its current position.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the id is taken or the tile is
    /// occupied.
    pub fn add_agent(&mut self, agent: Agent) -> Result<AgentId, TickError> {
        let id = agent.id;
        self.roster.insert(agent)?;
        Ok(id)
    }

    /// Take an agent out of the simulation for good and free its name in
    /// `manager` for reuse.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::AgentNotFound`] for an unknown agent.
    pub fn remove_agent(
        &mut self,
        id: AgentId,
        manager: &mut AgentManager,
    ) -> Result<Agent, TickError> {
        let agent = self.roster.remove(id).ok_or(TickError::AgentNotFound(id))?;
        manager.release_name(&agent.name);
        info!(agent_id = %id, name = %agent.name, "agent removed");
        Ok(agent)
    }

    /// Move an agent outside hazard resolution (scripted moves, spawning
    /// into a vehicle). Returns the point it left.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the agent is unknown or the tile is
    /// occupied.
    pub fn relocate(&mut self, id: AgentId, to: Point) -> Result<Point, TickError> {
        Ok(self.roster.relocate(id, to)?)
    }

    /// Let `turns` pass without simulating them. Only meaningful while
    /// every agent that should age through them is unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] on turn overflow.
    pub fn skip_turns(&mut self, turns: u64) -> Result<Turn, TickError> {
        Ok(self.clock.advance_by(turns)?)
    }

    /// Take `id` out of the simulated region at the current turn.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::AgentNotFound`] for an unknown agent and
    /// [`TickError::Agent`] if it is already unloaded.
    pub fn unload_agent(&mut self, id: AgentId) -> Result<(), TickError> {
        let now = self.clock.turn();
        let agent = self.roster.agent_mut(id).ok_or(TickError::AgentNotFound(id))?;
        metabolism::on_unload(agent, now).map_err(|source| TickError::Agent {
            agent_id: id,
            source,
        })
    }

    /// Bring `id` back into the simulated region at the current turn,
    /// catching its needs up across the time it was away.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::AgentNotFound`] for an unknown agent and
    /// [`TickError::Agent`] if it is already loaded or the catch-up fails.
    pub fn load_agent(&mut self, id: AgentId) -> Result<CatchUpReport, TickError> {
        let now = self.clock.turn();
        let agent = self.roster.agent_mut(id).ok_or(TickError::AgentNotFound(id))?;
        let report = metabolism::on_load(agent, now, &LoggedActivity, &self.config.metabolism)
            .map_err(|source| TickError::Agent {
                agent_id: id,
                source,
            })?;
        info!(agent_id = %id, now, elapsed = report.elapsed, "agent loaded");
        Ok(report)
    }

    /// Simulate the current turn, then advance the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Agent`] if a need update fails,
    /// [`TickError::Movement`] if resolution hits a contract violation, and
    /// [`TickError::Clock`] on turn overflow.
    pub fn run_tick(&mut self) -> Result<TickSummary, TickError> {
        let turn = self.clock.turn();
        let ids: Vec<AgentId> = self.roster.ids().to_vec();

        // Phase 1: needs.
        let mut needs_updated: usize = 0;
        for id in &ids {
            let Some(agent) = self.roster.agent_mut(*id) else {
                continue;
            };
            if !agent.load_state.is_loaded() {
                continue;
            }
            vitals::apply_need_tick(agent, &self.config.metabolism, turn).map_err(|source| {
                TickError::Agent {
                    agent_id: *id,
                    source,
                }
            })?;
            needs_updated = needs_updated.saturating_add(1);
        }

        // Phase 2: movement.
        let mut outcomes = Vec::with_capacity(ids.len());
        for id in &ids {
            let loaded = self
                .roster
                .get(*id)
                .is_some_and(|agent| agent.load_state.is_loaded());
            if !loaded {
                continue;
            }
            let outcome = self
                .resolver
                .resolve_tick(*id, turn, &self.map, &mut self.roster)?;
            outcomes.push((*id, outcome));
        }

        // Phase 3: targeting.
        let targets: BTreeMap<AgentId, AgentId> = self
            .roster
            .iter()
            .filter_map(|agent| {
                select_target(agent, &self.roster, &self.map, &self.config.targeting)
                    .map(|target| (agent.id, target))
            })
            .collect();

        self.clock.advance()?;

        let moved = outcomes.iter().filter(|(_, o)| o.moved()).count();
        let blocked = outcomes.iter().filter(|(_, o)| o.is_blocked()).count();
        debug!(turn, needs_updated, moved, blocked, targets = targets.len(), "tick complete");

        Ok(TickSummary {
            turn,
            needs_updated,
            outcomes,
            targets,
        })
    }
}
