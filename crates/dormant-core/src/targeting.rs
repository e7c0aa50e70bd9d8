//! Hostile target selection.
//!
//! A hostile agent picks the nearest visible agent it is willing to attack:
//! the player, or any agent that is not itself hostile. Distance is
//! Chebyshev (king moves); ties go to whichever candidate the roster lists
//! first.

use dormant_types::{Agent, AgentId};
use dormant_world::{AgentRoster, LineOfSight};

use crate::config::TargetingConfig;

/// The target `agent` would engage, or `None` if it is not hostile or
/// nothing qualifies.
pub fn select_target<L: LineOfSight + ?Sized>(
    agent: &Agent,
    roster: &AgentRoster,
    los: &L,
    config: &TargetingConfig,
) -> Option<AgentId> {
    if !agent.attitude.is_hostile() || agent.is_player || !agent.load_state.is_loaded() {
        return None;
    }

    roster
        .iter()
        .filter(|other| other.id != agent.id && other.load_state.is_loaded())
        .filter(|other| other.is_player || !other.attitude.is_hostile())
        .filter_map(|other| {
            let distance = agent.position.chebyshev_distance(other.position)?;
            (distance <= config.max_range).then_some((distance, other))
        })
        .filter(|(_, other)| los.has_line_of_sight(agent.position, other.position))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, other)| other.id)
}
