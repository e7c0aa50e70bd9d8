//! Hazard-avoidance movement.
//!
//! Once per tick, each loaded agent that is not busy is resolved:
//!
//! 1. **Exemption** -- agents seated in a vehicle never evaluate hazards.
//! 2. **Safe** -- if the current tile does not hurt the agent it stays put.
//! 3. **Escape search** -- adjacent tiles that are known, passable, and
//!    strictly less dangerous are ranked by danger, then free tiles before
//!    tiles held by an agent that yields to a push. Busy, seated, and
//!    unpushable agents never yield. Ties keep the clockwise neighbor order
//!    starting at north.
//! 4. **Push** -- if the best tile is occupied, its occupant is asked to
//!    step aside by running the same search for it, accepting tiles no worse
//!    than its own. If it cannot, the escape is blocked. Every agent in a
//!    chain is recorded in a visited set and the chain is capped at
//!    [`MovementConfig::max_push_depth`] pushes, so resolution always
//!    terminates.
//! 5. **Commit** -- moves are applied to the roster immediately, and the
//!    mover's footing is recomputed from the tile it now stands on.
//!
//! A hazardous agent with nowhere better to go stays where it is and the
//! outcome is [`MoveOutcome::Blocked`]; that is an ordinary result, not an
//! error.

use std::collections::BTreeSet;

use dormant_types::{
    Agent, AgentId, BlockReason, Displacement, IdleReason, MoveOutcome, Point, Turn,
};
use dormant_world::{HazardView, Occupancy, WorldError, is_vehicle_exempt, refresh_footing};
use tracing::{debug, trace};

use crate::config::MovementConfig;

/// Errors that can occur while resolving movement.
///
/// All of these are caller contract violations. A blocked escape is a
/// [`MoveOutcome`], never an error.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// The agent is not in the roster.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Movement was requested for an agent outside the simulated region.
    #[error("agent {0} is not loaded")]
    AgentNotLoaded(AgentId),

    /// The roster rejected a move the resolver had checked.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Which neighbor dangers an escape search accepts.
#[derive(Debug, Clone, Copy)]
enum DangerLimit {
    /// Strictly less than the current danger (the escaping agent).
    Below(u32),
    /// No worse than the current danger (an agent stepping aside).
    AtMost(u32),
}

impl DangerLimit {
    const fn admits(self, danger: u32) -> bool {
        match self {
            Self::Below(limit) => danger < limit,
            Self::AtMost(limit) => danger <= limit,
        }
    }
}

/// A neighbor that passed the danger and passability checks.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    at: Point,
    danger: u32,
    occupant: Option<AgentId>,
}

/// State shared by every search in one push chain.
struct PushChain {
    now: Turn,
    /// Agents already asked to move, starting with the escaper.
    visited: BTreeSet<AgentId>,
    /// Completed pushes, innermost first.
    pushed: Vec<Displacement>,
}

/// Result of one escape search.
enum Escape {
    Moved(Displacement),
    Blocked(BlockReason),
}

/// Resolves hazard-driven movement for one agent at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementResolver {
    config: MovementConfig,
}

impl MovementResolver {
    /// Create a resolver.
    pub const fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Resolve one tick of hazard avoidance for `id` at turn `now`.
    ///
    /// Reads tiles through `world` and commits moves through `occupants`.
    ///
    /// # Errors
    ///
    /// Returns [`MovementError::AgentNotFound`] for an unknown agent and
    /// [`MovementError::AgentNotLoaded`] for an unloaded one.
    pub fn resolve_tick<W, O>(
        &self,
        id: AgentId,
        now: Turn,
        world: &W,
        occupants: &mut O,
    ) -> Result<MoveOutcome, MovementError>
    where
        W: HazardView + ?Sized,
        O: Occupancy + ?Sized,
    {
        let agent = occupants.agent(id).ok_or(MovementError::AgentNotFound(id))?;
        if !agent.load_state.is_loaded() {
            return Err(MovementError::AgentNotLoaded(id));
        }
        if agent.is_busy(now) {
            return Ok(MoveOutcome::NotApplicable {
                reason: IdleReason::Busy,
            });
        }
        // Exemption is decided before any tile is read.
        let exempt = is_vehicle_exempt(agent);
        let position = agent.position;
        let here = world.hazard_at(position);
        let danger = here
            .as_ref()
            .map_or(0, |tile| tile.danger_for(&agent.immunities));

        if exempt || danger == 0 {
            if let Some(agent) = occupants.agent_mut(id) {
                refresh_footing(agent, here.as_ref());
            }
            let reason = if exempt {
                IdleReason::VehicleExempt
            } else {
                IdleReason::SafeTile
            };
            trace!(agent_id = %id, now, ?reason, "no hazard movement");
            return Ok(MoveOutcome::NotApplicable { reason });
        }

        let mut chain = PushChain {
            now,
            visited: BTreeSet::from([id]),
            pushed: Vec::new(),
        };
        let escape = self.escape(
            id,
            DangerLimit::Below(danger),
            self.config.max_push_depth,
            &mut chain,
            world,
            occupants,
        )?;
        let pushed = chain.pushed;

        match escape {
            Escape::Moved(step) => {
                debug!(
                    agent_id = %id,
                    now,
                    from = %step.from,
                    to = %step.to,
                    pushed = pushed.len(),
                    "agent escaped hazard"
                );
                Ok(MoveOutcome::Moved { step, pushed })
            }
            Escape::Blocked(reason) => {
                if let Some(agent) = occupants.agent_mut(id) {
                    refresh_footing(agent, here.as_ref());
                }
                debug!(agent_id = %id, now, at = %position, danger, ?reason, "escape blocked");
                Ok(MoveOutcome::Blocked { reason })
            }
        }
    }

    /// Search the neighbors of `id` for a tile admitted by `limit` and move
    /// there, pushing at most `pushes_left` agents out of the way.
    ///
    /// Only the best-ranked tile is attempted. If it is held by an agent
    /// that fails to step aside, the search ends blocked rather than
    /// settling for a worse tile.
    fn escape<W, O>(
        &self,
        id: AgentId,
        limit: DangerLimit,
        pushes_left: u32,
        chain: &mut PushChain,
        world: &W,
        occupants: &mut O,
    ) -> Result<Escape, MovementError>
    where
        W: HazardView + ?Sized,
        O: Occupancy + ?Sized,
    {
        let agent = occupants.agent(id).ok_or(MovementError::AgentNotFound(id))?;
        let from = agent.position;
        let immunities = agent.immunities.clone();

        let mut admitted_any = false;
        let mut candidates = Vec::new();
        for direction in self.config.neighborhood.directions() {
            let Some(at) = from.step(*direction) else {
                continue;
            };
            // Unknown tiles are impassable.
            let Some(tile) = world.hazard_at(at) else {
                continue;
            };
            if !tile.passable {
                continue;
            }
            let danger = tile.danger_for(&immunities);
            if !limit.admits(danger) {
                continue;
            }
            admitted_any = true;

            let occupant = occupants.occupant(at);
            if let Some(other) = occupant
                && (pushes_left == 0
                    || chain.visited.contains(&other)
                    || !occupants
                        .agent(other)
                        .is_some_and(|agent| yields_to_push(agent, chain.now)))
            {
                continue;
            }
            candidates.push(Candidate {
                at,
                danger,
                occupant,
            });
        }
        // Stable sort: ties keep neighbor order.
        candidates.sort_by_key(|candidate| (candidate.danger, candidate.occupant.is_some()));

        let Some(best) = candidates.first().copied() else {
            return Ok(Escape::Blocked(if admitted_any {
                BlockReason::Occupied
            } else {
                BlockReason::NoSaferTile
            }));
        };

        if let Some(other) = best.occupant {
            chain.visited.insert(other);
            let other_danger = current_danger(other, world, occupants)?;
            let inner = self.escape(
                other,
                DangerLimit::AtMost(other_danger),
                pushes_left.saturating_sub(1),
                chain,
                world,
                occupants,
            )?;
            match inner {
                Escape::Moved(step) => {
                    trace!(agent_id = %other, from = %step.from, to = %step.to, "agent pushed");
                    chain.pushed.push(step);
                }
                Escape::Blocked(_) => return Ok(Escape::Blocked(BlockReason::Occupied)),
            }
        }

        let left = occupants.relocate(id, best.at)?;
        let destination = world.hazard_at(best.at);
        if let Some(agent) = occupants.agent_mut(id) {
            refresh_footing(agent, destination.as_ref());
        }
        Ok(Escape::Moved(Displacement {
            agent: id,
            from: left,
            to: best.at,
        }))
    }
}

/// Whether `agent` can be asked to vacate its tile at turn `now`.
fn yields_to_push(agent: &Agent, now: Turn) -> bool {
    agent.pushable
        && !is_vehicle_exempt(agent)
        && agent.load_state.is_loaded()
        && !agent.is_busy(now)
}

fn current_danger<W, O>(id: AgentId, world: &W, occupants: &O) -> Result<u32, MovementError>
where
    W: HazardView + ?Sized,
    O: Occupancy + ?Sized,
{
    let agent = occupants.agent(id).ok_or(MovementError::AgentNotFound(id))?;
    Ok(world
        .hazard_at(agent.position)
        .map_or(0, |tile| tile.danger_for(&agent.immunities)))
}
