//! Shared type definitions for the Dormant NPC simulation core.
//!
//! This crate is the single source of truth for the data both subsystems
//! share. The catch-up integrator (`dormant-agents`) and the movement
//! resolver (`dormant-core`) communicate only through the [`Agent`] defined
//! here.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Activity, attitude, field kinds, statuses, directions
//! - [`structs`] -- [`Agent`], [`Needs`], [`Point`], activity log, load state
//! - [`outcome`] -- Per-tick [`MoveOutcome`] records

pub mod enums;
pub mod ids;
pub mod outcome;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Activity, Attitude, Direction, FieldKind, Neighborhood, TransientStatus};
pub use ids::{AgentId, VehicleId};
pub use outcome::{BlockReason, Displacement, IdleReason, MoveOutcome};
pub use structs::{
    ActivityLog, Agent, LoadState, NeedResidue, Needs, Point, Turn, VehicleSeat,
};
