//! Need mechanics applied to loaded agents each turn.
//!
//! This is the reference path the catch-up integrator is checked against.
//! Each call advances one agent by exactly one turn:
//!
//! - Hunger and thirst increase by their per-period rate divided by the
//!   period length.
//! - Awake agents accrue fatigue at the awake rate.
//! - Resting agents recover fatigue at the ramp rate in effect at the start
//!   of the turn.
//!
//! Remainders are carried in the same residue units as [`catch_up`], so the
//! two paths share clamping and rounding rules. Transitions that can no
//! longer matter are pruned from the activity log as the agent ticks.
//!
//! [`catch_up`]: crate::metabolism::catch_up

use dormant_types::{Activity, Agent, Needs, Turn};
use rust_decimal::Decimal;

use crate::config::MetabolismConfig;
use crate::error::AgentError;
use crate::metabolism::{NeedDeltas, apply_deltas, linear_accrual};

/// Result of applying one turn of need mechanics to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedTickResult {
    /// Activity the turn was accounted under.
    pub activity: Activity,
    /// Needs after the turn.
    pub needs: Needs,
}

/// Apply one turn of need mechanics to `agent` at turn `now`.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if a delta cannot be
/// represented.
pub fn apply_need_tick(
    agent: &mut Agent,
    config: &MetabolismConfig,
    now: Turn,
) -> Result<NeedTickResult, AgentError> {
    let activity = agent.activity_at(now);
    let fatigue = match activity {
        Activity::Awake => linear_accrual(config.fatigue_per_period, 1, config)?,
        Activity::Resting => {
            let offset = agent
                .activity_log
                .run_started_at(now)
                .map_or(0, |began| now.saturating_sub(began));
            let recovered = rest_turn_units(offset, config)?;
            Decimal::ZERO
                .checked_sub(recovered)
                .ok_or_else(|| AgentError::overflow("per-turn rest recovery"))?
        }
    };
    let deltas = NeedDeltas {
        hunger: linear_accrual(config.hunger_per_period, 1, config)?,
        thirst: linear_accrual(config.thirst_per_period, 1, config)?,
        fatigue,
    };
    apply_deltas(agent, deltas, config)?;
    agent.activity_log.prune_before(now);

    Ok(NeedTickResult {
        activity,
        needs: agent.needs,
    })
}

/// One turn of recovery at ramp offset `offset`, in residue units:
/// `2T * R0 + 2 * (R1 - R0) * min(offset, T)`.
fn rest_turn_units(offset: u64, config: &MetabolismConfig) -> Result<Decimal, AgentError> {
    let overflow = || AgentError::overflow("per-turn rest recovery");
    let ramp = config.rest_ramp_turns;
    let base = config
        .rest_recovery_start
        .checked_mul(Decimal::from(ramp))
        .and_then(|v| v.checked_mul(Decimal::TWO))
        .ok_or_else(overflow)?;
    let progress = config
        .rest_recovery_peak
        .checked_sub(config.rest_recovery_start)
        .and_then(|span| span.checked_mul(Decimal::from(offset.min(ramp))))
        .and_then(|v| v.checked_mul(Decimal::TWO))
        .ok_or_else(overflow)?;
    base.checked_add(progress).ok_or_else(overflow)
}
