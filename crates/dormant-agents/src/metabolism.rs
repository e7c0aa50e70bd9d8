//! Metabolic catch-up for agents re-entering the simulated region.
//!
//! While an agent is unloaded no per-turn updates run. When it is loaded
//! again, [`catch_up`] advances its needs across the skipped interval in
//! O(segments) arithmetic instead of replaying every turn:
//!
//! - Hunger and thirst accrue linearly at the same rate awake or resting.
//! - Fatigue accrues linearly while awake.
//! - Fatigue recovers while resting at a rate that ramps linearly from R0 to
//!   R1 over the configured ramp, then holds at R1. The recovered amount is
//!   the exact integral of that rate over the segment.
//!
//! Needs are integers with an exact [`NeedResidue`] remainder carried
//! alongside, so two adjoining catch-ups produce the same end state as one
//! covering both intervals.
//!
//! [`NeedResidue`]: dormant_types::NeedResidue

use dormant_types::{Activity, Agent, LoadState, Needs, Turn};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, trace};

use crate::activity::{ActivityHistory, ActivitySegment};
use crate::config::{MetabolismConfig, NeedBounds};
use crate::error::AgentError;

/// Summary of one catch-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUpReport {
    /// Needs before the catch-up.
    pub before: Needs,
    /// Needs after the catch-up.
    pub after: Needs,
    /// Number of constant-activity segments evaluated.
    pub segments: usize,
    /// Length of the caught-up interval in turns.
    pub elapsed: u64,
}

/// Per-need deltas in residue units (see
/// [`MetabolismConfig::residue_scale`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NeedDeltas {
    pub(crate) hunger: Decimal,
    pub(crate) thirst: Decimal,
    pub(crate) fatigue: Decimal,
}

/// Advance `agent`'s needs across `[from, to)` and mark it loaded at `to`.
///
/// `history` supplies the constant-activity segments; they are clipped to
/// the interval. Needs are clamped to their configured bounds after every
/// segment.
///
/// # Errors
///
/// Returns [`AgentError::InvalidInterval`] if `to < from`. This is a
/// scheduling bug in the caller, not a recoverable condition. Returns
/// [`AgentError::ArithmeticOverflow`] if a delta cannot be represented.
pub fn catch_up<H: ActivityHistory + ?Sized>(
    agent: &mut Agent,
    from: Turn,
    to: Turn,
    history: &H,
    config: &MetabolismConfig,
) -> Result<CatchUpReport, AgentError> {
    if to < from {
        return Err(AgentError::InvalidInterval { from, to });
    }

    let before = agent.needs;
    let segments: Vec<ActivitySegment> = history
        .segments(agent, from, to)
        .into_iter()
        .filter_map(|segment| segment.clip(from, to))
        .collect();

    for segment in &segments {
        let deltas = segment_deltas(segment, config)?;
        trace!(
            agent_id = %agent.id,
            start = segment.start,
            end = segment.end,
            activity = ?segment.activity,
            run_offset = segment.run_offset,
            "applying catch-up segment"
        );
        apply_deltas(agent, deltas, config)?;
    }

    agent.load_state = LoadState::Loaded { since: to };
    agent.activity_log.prune_before(to);

    let elapsed = to.saturating_sub(from);
    debug!(
        agent_id = %agent.id,
        elapsed,
        segments = segments.len(),
        hunger = agent.needs.hunger,
        thirst = agent.needs.thirst,
        fatigue = agent.needs.fatigue,
        "caught up needs"
    );

    Ok(CatchUpReport {
        before,
        after: agent.needs,
        segments: segments.len(),
        elapsed,
    })
}

/// Mark `agent` unloaded at `now`.
///
/// # Errors
///
/// Returns [`AgentError::AlreadyUnloaded`] if the agent is not loaded.
pub fn on_unload(agent: &mut Agent, now: Turn) -> Result<(), AgentError> {
    if !agent.load_state.is_loaded() {
        return Err(AgentError::AlreadyUnloaded(agent.id));
    }
    agent.load_state = LoadState::Unloaded { since: now };
    debug!(agent_id = %agent.id, now, "agent unloaded");
    Ok(())
}

/// Load `agent` at `now`, catching up needs from its unload turn.
///
/// # Errors
///
/// Returns [`AgentError::AlreadyLoaded`] if the agent is loaded, and
/// [`AgentError::InvalidInterval`] if `now` precedes the unload turn.
pub fn on_load<H: ActivityHistory + ?Sized>(
    agent: &mut Agent,
    now: Turn,
    history: &H,
    config: &MetabolismConfig,
) -> Result<CatchUpReport, AgentError> {
    let LoadState::Unloaded { since } = agent.load_state else {
        return Err(AgentError::AlreadyLoaded(agent.id));
    };
    catch_up(agent, since, now, history, config)
}

/// Need deltas accrued over one constant-activity segment.
pub(crate) fn segment_deltas(
    segment: &ActivitySegment,
    config: &MetabolismConfig,
) -> Result<NeedDeltas, AgentError> {
    let duration = segment.duration();
    let hunger = linear_accrual(config.hunger_per_period, duration, config)?;
    let thirst = linear_accrual(config.thirst_per_period, duration, config)?;
    let fatigue = match segment.activity {
        Activity::Awake => linear_accrual(config.fatigue_per_period, duration, config)?,
        Activity::Resting => {
            let end = segment
                .run_offset
                .checked_add(duration)
                .ok_or_else(|| AgentError::overflow("rest offset"))?;
            let recovered = rest_recovery_units(segment.run_offset, end, config)?;
            Decimal::ZERO
                .checked_sub(recovered)
                .ok_or_else(|| AgentError::overflow("rest recovery"))?
        }
    };
    Ok(NeedDeltas {
        hunger,
        thirst,
        fatigue,
    })
}

/// `rate_per_period * turns / period` points, in residue units.
pub(crate) fn linear_accrual(
    rate_per_period: Decimal,
    turns: u64,
    config: &MetabolismConfig,
) -> Result<Decimal, AgentError> {
    let two_ramp = Decimal::from(config.rest_ramp_turns)
        .checked_mul(Decimal::TWO)
        .ok_or_else(|| AgentError::overflow("ramp scale"))?;
    rate_per_period
        .checked_mul(Decimal::from(turns))
        .and_then(|scaled| scaled.checked_mul(two_ramp))
        .ok_or_else(|| AgentError::overflow("linear accrual"))
}

/// Fatigue recovered between `a` and `b` turns into a continuous rest, in
/// need points.
///
/// This is the definite integral of the piecewise-linear recovery rate:
/// on the ramp `[0, T)` the rate is `R0 + (R1 - R0) * t / T`, afterwards it
/// is `R1`. Rates are per period, so the integral is divided by the period
/// length.
///
/// # Errors
///
/// Returns [`AgentError::ArithmeticOverflow`] if an intermediate value
/// exceeds [`Decimal`] range.
pub fn rest_recovery(a: u64, b: u64, config: &MetabolismConfig) -> Result<Decimal, AgentError> {
    let units = rest_recovery_units(a, b, config)?;
    let scale = config
        .residue_scale()
        .ok_or_else(|| AgentError::overflow("residue scale"))?;
    units
        .checked_div(scale)
        .ok_or_else(|| AgentError::overflow("rest recovery scale"))
}

/// [`rest_recovery`] multiplied by the residue scale. Every term is a
/// product of integers and configured rates, so the result is exact.
fn rest_recovery_units(a: u64, b: u64, config: &MetabolismConfig) -> Result<Decimal, AgentError> {
    if b <= a {
        return Ok(Decimal::ZERO);
    }
    let overflow = || AgentError::overflow("rest recovery integral");
    let ramp = config.rest_ramp_turns;
    let two_ramp = Decimal::from(ramp)
        .checked_mul(Decimal::TWO)
        .ok_or_else(overflow)?;
    let r0 = config.rest_recovery_start;
    let r1 = config.rest_recovery_peak;

    // Ramp piece over [min(a, T), min(b, T)):
    //   2T * R0 * (b' - a') + (R1 - R0) * (b'^2 - a'^2)
    let ramp_a = a.min(ramp);
    let ramp_b = b.min(ramp);
    let ramp_turns = Decimal::from(ramp_b.saturating_sub(ramp_a));
    let linear = r0
        .checked_mul(ramp_turns)
        .and_then(|v| v.checked_mul(two_ramp))
        .ok_or_else(overflow)?;
    let squares = Decimal::from(ramp_b)
        .checked_mul(Decimal::from(ramp_b))
        .and_then(|bb| {
            Decimal::from(ramp_a)
                .checked_mul(Decimal::from(ramp_a))
                .and_then(|aa| bb.checked_sub(aa))
        })
        .ok_or_else(overflow)?;
    let slope = r1
        .checked_sub(r0)
        .and_then(|span| span.checked_mul(squares))
        .ok_or_else(overflow)?;

    // Plateau piece over [max(a, T), b):  2T * R1 * turns
    let plateau_turns = b.saturating_sub(a.max(ramp));
    let plateau = r1
        .checked_mul(Decimal::from(plateau_turns))
        .and_then(|v| v.checked_mul(two_ramp))
        .ok_or_else(overflow)?;

    linear
        .checked_add(slope)
        .and_then(|v| v.checked_add(plateau))
        .ok_or_else(overflow)
}

/// Apply deltas to all three needs, clamping each to its bounds.
pub(crate) fn apply_deltas(
    agent: &mut Agent,
    deltas: NeedDeltas,
    config: &MetabolismConfig,
) -> Result<(), AgentError> {
    let scale = config
        .residue_scale()
        .ok_or_else(|| AgentError::overflow("residue scale"))?;
    apply_need_delta(
        &mut agent.needs.hunger,
        &mut agent.residue.hunger,
        deltas.hunger,
        config.hunger_bounds,
        scale,
    )?;
    apply_need_delta(
        &mut agent.needs.thirst,
        &mut agent.residue.thirst,
        deltas.thirst,
        config.thirst_bounds,
        scale,
    )?;
    apply_need_delta(
        &mut agent.needs.fatigue,
        &mut agent.residue.fatigue,
        deltas.fatigue,
        config.fatigue_bounds,
        scale,
    )
}

/// Add `delta` to the exact value `value * scale + residue`, then split it
/// back into whole points and a remainder in `[0, scale)`. Hitting a bound
/// clears the remainder.
fn apply_need_delta(
    value: &mut u32,
    residue: &mut Decimal,
    delta: Decimal,
    bounds: NeedBounds,
    scale: Decimal,
) -> Result<(), AgentError> {
    let overflow = || AgentError::overflow("need accumulation");
    let exact = Decimal::from(*value)
        .checked_mul(scale)
        .and_then(|v| v.checked_add(*residue))
        .and_then(|v| v.checked_add(delta))
        .ok_or_else(overflow)?;

    let floor = Decimal::from(bounds.floor)
        .checked_mul(scale)
        .ok_or_else(overflow)?;
    let ceiling = Decimal::from(bounds.ceiling)
        .checked_mul(scale)
        .ok_or_else(overflow)?;
    if exact <= floor {
        *value = bounds.floor;
        *residue = Decimal::ZERO;
        return Ok(());
    }
    if exact >= ceiling {
        *value = bounds.ceiling;
        *residue = Decimal::ZERO;
        return Ok(());
    }

    let whole = exact.checked_div(scale).ok_or_else(overflow)?.floor();
    let remainder = whole
        .checked_mul(scale)
        .and_then(|used| exact.checked_sub(used))
        .ok_or_else(overflow)?;
    *value = whole
        .to_u32()
        .ok_or_else(|| AgentError::overflow("need out of u32 range"))?;
    *residue = remainder;
    Ok(())
}
