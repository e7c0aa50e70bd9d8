//! World clock and time tracking for the Dormant simulation.
//!
//! The clock is the single source of truth for the current turn. Nothing in
//! the agent or movement code reads it directly: the tick cycle passes the
//! turn it reports into every call.
//!
//! All temporal derivations use checked arithmetic (no silent overflow).

use dormant_types::Turn;

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Turn counter would overflow.
    #[error("turn counter overflow: cannot advance beyond u64::MAX")]
    TurnOverflow,

    /// Invalid time configuration (e.g. zero turns per minute).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// World clock tracking the simulation's current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldClock {
    /// Current turn number (0-indexed).
    turn: Turn,

    /// Number of turns per simulated minute (from configuration).
    turns_per_minute: u64,
}

impl WorldClock {
    /// Create a clock at turn 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `turns_per_minute` is 0.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        Self::from_parts(0, config.turns_per_minute)
    }

    /// Create a clock from explicit parameters (useful for testing and
    /// state restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `turns_per_minute` is 0.
    pub fn from_parts(turn: Turn, turns_per_minute: u64) -> Result<Self, ClockError> {
        if turns_per_minute == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "turns_per_minute must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            turn,
            turns_per_minute,
        })
    }

    /// Advance the clock by one turn. Returns the new turn number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TurnOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<Turn, ClockError> {
        self.advance_by(1)
    }

    /// Advance the clock by `turns`. Returns the new turn number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TurnOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance_by(&mut self, turns: u64) -> Result<Turn, ClockError> {
        self.turn = self.turn.checked_add(turns).ok_or(ClockError::TurnOverflow)?;
        Ok(self.turn)
    }

    /// Return the current turn number.
    pub const fn turn(&self) -> Turn {
        self.turn
    }

    /// Return the configured number of turns per minute.
    pub const fn turns_per_minute(&self) -> u64 {
        self.turns_per_minute
    }

    /// Number of turns in `minutes` simulated minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TurnOverflow`] if the product overflows.
    pub fn turns_for_minutes(&self, minutes: u64) -> Result<u64, ClockError> {
        minutes
            .checked_mul(self.turns_per_minute)
            .ok_or(ClockError::TurnOverflow)
    }

    /// Whole simulated minutes elapsed since turn 0.
    pub const fn minutes_elapsed(&self) -> u64 {
        // turns_per_minute >= 1 is guaranteed by the constructor.
        match self.turn.checked_div(self.turns_per_minute) {
            Some(minutes) => minutes,
            None => 0,
        }
    }
}
