//! Agent needs, activity history, and lifecycle for the Dormant simulation.
//!
//! This crate contains the logic layer for agent survival needs. It sits
//! between `dormant-types` (which defines the data structures) and
//! `dormant-core` (which owns the clock and the tick cycle).
//!
//! # Modules
//!
//! - [`activity`] -- Constant-activity segments over an interval ([`ActivityHistory`])
//! - [`agent`] -- Agent creation and management ([`AgentManager`])
//! - [`config`] -- Rates and bounds for need mechanics ([`MetabolismConfig`])
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`metabolism`] -- Closed-form catch-up for unloaded intervals ([`catch_up`])
//! - [`vitals`] -- Per-turn need mechanics for loaded agents

pub mod activity;
pub mod agent;
pub mod config;
pub mod error;
pub mod metabolism;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use activity::{ActivityHistory, ActivitySegment, ConstantActivity, LoggedActivity};
pub use agent::AgentManager;
pub use config::{MetabolismConfig, NeedBounds};
pub use error::AgentError;
pub use metabolism::{CatchUpReport, catch_up, on_load, on_unload, rest_recovery};
pub use vitals::{NeedTickResult, apply_need_tick};
