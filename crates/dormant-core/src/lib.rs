//! World clock, hazard-avoidance movement, and tick cycle for the Dormant
//! simulation.
//!
//! # Modules
//!
//! - [`clock`] -- Turn counter with minute conversion.
//! - [`config`] -- Configuration loading from YAML into strongly-typed
//!   structs.
//! - [`logging`] -- Tracing subscriber setup for binaries and tests.
//! - [`movement`] -- Per-agent hazard escape with bounded push chains.
//! - [`targeting`] -- Hostile target selection.
//! - [`tick`] -- The [`Simulation`] and its per-turn cycle.
//!
//! [`Simulation`]: tick::Simulation

pub mod clock;
pub mod config;
pub mod logging;
pub mod movement;
pub mod targeting;
pub mod tick;

pub use clock::{ClockError, WorldClock};
pub use config::{
    ConfigError, LoggingConfig, MovementConfig, SimulationConfig, TargetingConfig, TimeConfig,
};
pub use logging::init_tracing;
pub use movement::{MovementError, MovementResolver};
pub use targeting::select_target;
pub use tick::{Simulation, TickError, TickSummary};
