//! Configuration constants and defaults for agent metabolism.
//!
//! Rates are game-balance parameters: the integrator fixes their *shape*
//! (linear accrual, two-phase rest recovery) but every literal lives here
//! so callers (tick cycle, tests) can override defaults. Rates are
//! [`Decimal`] values per rate period so that fractional accrual never goes
//! through floating point.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AgentError;

/// Inclusive floor and ceiling for one need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NeedBounds {
    /// Lowest value the need may hold.
    pub floor: u32,
    /// Highest value the need may hold.
    pub ceiling: u32,
}

impl NeedBounds {
    /// Bounds from zero to `ceiling`.
    pub const fn up_to(ceiling: u32) -> Self {
        Self { floor: 0, ceiling }
    }
}

/// Configuration for need accrual and rest recovery.
///
/// The defaults model one turn as one second and a rate period of five
/// minutes: a quarter point of hunger and thirst and one point of fatigue
/// per period while awake; rest recovery starting at one point per period
/// and ramping linearly to two points per period over two hours.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetabolismConfig {
    /// Turns in one rate period (default: 300).
    pub rate_period_turns: u64,

    /// Hunger accrued per period, awake or resting (default: 0.25).
    pub hunger_per_period: Decimal,

    /// Thirst accrued per period, awake or resting (default: 0.25).
    pub thirst_per_period: Decimal,

    /// Fatigue accrued per period while awake (default: 1).
    pub fatigue_per_period: Decimal,

    /// Fatigue recovered per period at the start of a rest (R0, default: 1).
    pub rest_recovery_start: Decimal,

    /// Fatigue recovered per period once the ramp completes (R1, default: 2).
    pub rest_recovery_peak: Decimal,

    /// Turns of continuous rest for recovery to ramp from R0 to R1
    /// (default: 7200).
    pub rest_ramp_turns: u64,

    /// Valid hunger range (default: 0..=6000).
    pub hunger_bounds: NeedBounds,

    /// Valid thirst range (default: 0..=1200).
    pub thirst_bounds: NeedBounds,

    /// Valid fatigue range (default: 0..=1400).
    pub fatigue_bounds: NeedBounds,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            rate_period_turns: 300,
            hunger_per_period: Decimal::new(25, 2),
            thirst_per_period: Decimal::new(25, 2),
            fatigue_per_period: Decimal::ONE,
            rest_recovery_start: Decimal::ONE,
            rest_recovery_peak: Decimal::TWO,
            rest_ramp_turns: 7200,
            hunger_bounds: NeedBounds::up_to(6000),
            thirst_bounds: NeedBounds::up_to(1200),
            fatigue_bounds: NeedBounds::up_to(1400),
        }
    }
}

impl MetabolismConfig {
    /// Reject configurations the integrator cannot evaluate.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] for a zero rate period, a zero
    /// ramp, negative rates, a recovery ramp that decreases, or bounds
    /// whose floor exceeds the ceiling.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.rate_period_turns == 0 {
            return Err(invalid("rate_period_turns must be at least 1"));
        }
        if self.rest_ramp_turns == 0 {
            return Err(invalid("rest_ramp_turns must be at least 1"));
        }
        let rates = [
            self.hunger_per_period,
            self.thirst_per_period,
            self.fatigue_per_period,
            self.rest_recovery_start,
            self.rest_recovery_peak,
        ];
        if rates.iter().any(Decimal::is_sign_negative) {
            return Err(invalid("rates must not be negative"));
        }
        if self.residue_scale().is_none() {
            return Err(invalid("rate_period_turns * rest_ramp_turns overflows"));
        }
        if self.rest_recovery_start > self.rest_recovery_peak {
            return Err(invalid("rest_recovery_start must not exceed rest_recovery_peak"));
        }
        for (name, bounds) in [
            ("hunger_bounds", self.hunger_bounds),
            ("thirst_bounds", self.thirst_bounds),
            ("fatigue_bounds", self.fatigue_bounds),
        ] {
            if bounds.floor > bounds.ceiling {
                return Err(AgentError::InvalidConfig {
                    reason: format!("{name}: floor exceeds ceiling"),
                });
            }
        }
        Ok(())
    }

    /// Units per need point used for [`NeedResidue`] remainders.
    ///
    /// Equal to `rate_period_turns * 2 * rest_ramp_turns`. At this scale
    /// every linear accrual and every rest-recovery integral over whole
    /// turns is an exact decimal, so remainders never lose precision.
    ///
    /// [`NeedResidue`]: dormant_types::NeedResidue
    pub fn residue_scale(&self) -> Option<Decimal> {
        let units = self
            .rate_period_turns
            .checked_mul(self.rest_ramp_turns)?
            .checked_mul(2)?;
        Some(Decimal::from(units))
    }

    /// Fatigue recovered per period after `offset` turns of continuous rest.
    pub fn rest_rate_at(&self, offset: u64) -> Option<Decimal> {
        let clamped = offset.min(self.rest_ramp_turns);
        let span = self
            .rest_recovery_peak
            .checked_sub(self.rest_recovery_start)?;
        let progress = span
            .checked_mul(Decimal::from(clamped))?
            .checked_div(Decimal::from(self.rest_ramp_turns))?;
        self.rest_recovery_start.checked_add(progress)
    }
}

fn invalid(reason: &str) -> AgentError {
    AgentError::InvalidConfig {
        reason: reason.to_owned(),
    }
}
