//! Error types for the `dormant-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use dormant_types::{AgentId, Point};

/// Errors that can occur during tile-grid and roster operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An agent was not found in the roster.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// An agent with the same id is already in the roster.
    #[error("duplicate agent id: {0}")]
    DuplicateAgent(AgentId),

    /// The destination tile already holds another agent.
    #[error("tile {at} is occupied by agent {by}")]
    TileOccupied {
        /// The contested tile.
        at: Point,
        /// The agent standing there.
        by: AgentId,
    },

    /// A layout row contains a character the legend does not define.
    #[error("unknown layout character {ch:?} at row {row}, column {column}")]
    UnknownLayoutChar {
        /// The offending character.
        ch: char,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },

    /// A layout coordinate does not fit the map coordinate range.
    #[error("layout coordinate out of range at row {row}, column {column}")]
    LayoutOutOfRange {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },
}
