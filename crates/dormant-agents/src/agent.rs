//! Agent creation and management.
//!
//! The [`AgentManager`] creates NPCs and the player with unique names and
//! the default push policy for their attitude. New agents start loaded at
//! the creation turn with zero needs and an empty activity log.

use std::collections::BTreeSet;

use dormant_types::{
    ActivityLog, Agent, AgentId, Attitude, LoadState, NeedResidue, Needs, Point, Turn,
};
use tracing::debug;

use crate::error::AgentError;

/// Creates and tracks agents for the simulation.
///
/// The manager enforces name uniqueness across NPCs and the player.
#[derive(Debug, Default)]
pub struct AgentManager {
    /// Set of all agent names currently in use (for uniqueness checks).
    names_in_use: BTreeSet<String>,
}

impl AgentManager {
    /// Create a new empty agent manager.
    pub const fn new() -> Self {
        Self {
            names_in_use: BTreeSet::new(),
        }
    }

    /// Create an NPC at `position`.
    ///
    /// Follow and neutral NPCs are pushable; hostile NPCs are not.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is already taken.
    pub fn create_npc(
        &mut self,
        name: String,
        position: Point,
        attitude: Attitude,
        now: Turn,
    ) -> Result<Agent, AgentError> {
        self.claim_name(&name)?;
        let agent = new_agent(name, position, attitude, attitude.yields_to_push(), false, now);
        debug!(agent_id = %agent.id, name = %agent.name, ?attitude, %position, "npc created");
        Ok(agent)
    }

    /// Create the player character at `position`. The player is never
    /// pushable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DuplicateName`] if the name is already taken.
    pub fn create_player(
        &mut self,
        name: String,
        position: Point,
        now: Turn,
    ) -> Result<Agent, AgentError> {
        self.claim_name(&name)?;
        let agent = new_agent(name, position, Attitude::Follow, false, true, now);
        debug!(agent_id = %agent.id, name = %agent.name, %position, "player created");
        Ok(agent)
    }

    /// Release a name back to the pool once its agent has been removed.
    ///
    /// Returns `true` if the name was in use and is now released.
    pub fn release_name(&mut self, name: &str) -> bool {
        self.names_in_use.remove(name)
    }

    fn claim_name(&mut self, name: &str) -> Result<(), AgentError> {
        if !self.names_in_use.insert(name.to_owned()) {
            return Err(AgentError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }
}

fn new_agent(
    name: String,
    position: Point,
    attitude: Attitude,
    pushable: bool,
    is_player: bool,
    now: Turn,
) -> Agent {
    Agent {
        id: AgentId::new(),
        name,
        position,
        needs: Needs::default(),
        residue: NeedResidue::default(),
        activity_log: ActivityLog::new(),
        attitude,
        pushable,
        is_player,
        vehicle: None,
        transient: BTreeSet::new(),
        immunities: BTreeSet::new(),
        load_state: LoadState::Loaded { since: now },
        busy_until: None,
    }
}

/// A loaded neutral NPC at the origin, for unit tests.
#[cfg(test)]
pub(crate) fn test_agent() -> Agent {
    new_agent(
        String::from("Tester"),
        Point::default(),
        Attitude::Neutral,
        true,
        false,
        0,
    )
}
