//! Tile grid, hazard classification, and occupancy for the Dormant simulation.
//!
//! This crate models the physical surroundings the movement resolver reads:
//! tiles with terrain, furniture, fields and vehicle parts, a roster that
//! knows which agent stands where, and the collaborator traits the resolver
//! is written against.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid and roster operations.
//! - [`hazard`] -- [`TileHazard`] snapshots, per-agent danger, vehicle
//!   exemption, and footing recomputation.
//! - [`layout`] -- ASCII layout parser for scenarios and tests.
//! - [`roster`] -- [`AgentRoster`]: agents indexed by id and location.
//! - [`tile`] -- Terrain, furniture, fields, and the [`Tile`] itself.
//! - [`tile_map`] -- [`TileMap`]: sparse grid with Bresenham line of sight.
//! - [`view`] -- [`HazardView`], [`LineOfSight`], and [`Occupancy`].

pub mod error;
pub mod hazard;
pub mod layout;
pub mod roster;
pub mod tile;
pub mod tile_map;
pub mod view;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use hazard::{TileHazard, footing_status, is_vehicle_exempt, refresh_footing};
pub use layout::{ParsedLayout, parse_layout};
pub use roster::AgentRoster;
pub use tile::{Field, Furniture, Terrain, Tile};
pub use tile_map::TileMap;
pub use view::{HazardView, LineOfSight, Occupancy};
