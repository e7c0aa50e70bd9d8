//! Enumeration types for the Dormant simulation core.
//!
//! Covers the activity state that selects a metabolic rate curve, the
//! attitude an agent holds toward the player, the field kinds that make a
//! tile hazardous, transient status conditions, and the grid directions
//! used for escape searches.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// What an agent is doing for the purposes of metabolic accounting.
///
/// Hunger and thirst accrue identically in both states. Fatigue accrues
/// while [`Activity::Awake`] and recovers while [`Activity::Resting`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Up and about; fatigue accumulates.
    #[default]
    Awake,
    /// Asleep or otherwise resting; fatigue recovers along a ramp.
    Resting,
}

// ---------------------------------------------------------------------------
// Attitude
// ---------------------------------------------------------------------------

/// An NPC's standing attitude toward the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attitude {
    /// Follows the player; yields its tile when pushed.
    Follow,
    /// Neither allied nor hostile; yields its tile when pushed.
    Neutral,
    /// Wants the player dead; refuses to be pushed.
    Hostile,
}

impl Attitude {
    /// Whether an agent with this attitude steps aside for another agent by
    /// default.
    pub const fn yields_to_push(self) -> bool {
        matches!(self, Self::Follow | Self::Neutral)
    }

    /// Whether an agent with this attitude looks for combat targets.
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Hostile)
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A kind of field that can occupy a tile and harm agents standing in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Corrosive acid pool.
    Acid,
    /// Open flames.
    Fire,
    /// Choking smoke.
    Smoke,
    /// Live electrical arcing.
    Electricity,
}

impl FieldKind {
    /// Danger contributed per point of field intensity.
    pub const fn base_danger(self) -> u32 {
        match self {
            Self::Smoke => 1,
            Self::Acid | Self::Electricity => 2,
            Self::Fire => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Transient status
// ---------------------------------------------------------------------------

/// A short-lived status condition whose presence is derived from the tile an
/// agent stands on and re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransientStatus {
    /// Balancing on loose rubble or boulders.
    UnstableFooting,
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A compass step on the tile grid. `y` grows southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `(0, -1)`
    North,
    /// `(1, -1)`
    NorthEast,
    /// `(1, 0)`
    East,
    /// `(1, 1)`
    SouthEast,
    /// `(0, 1)`
    South,
    /// `(-1, 1)`
    SouthWest,
    /// `(-1, 0)`
    West,
    /// `(-1, -1)`
    NorthWest,
}

impl Direction {
    /// Clockwise enumeration starting at north. This order is the escape
    /// search tie-break.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// The four orthogonal directions, clockwise from north.
    pub const ORTHOGONAL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Grid offset `(dx, dy)` for one step in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

/// The set of tiles considered adjacent during an escape search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// All eight surrounding tiles.
    #[default]
    Moore,
    /// Only the four orthogonal tiles.
    VonNeumann,
}

impl Neighborhood {
    /// Directions belonging to this neighborhood, in tie-break order.
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Self::Moore => &Direction::ALL,
            Self::VonNeumann => &Direction::ORTHOGONAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attitude_push_defaults() {
        assert!(Attitude::Follow.yields_to_push());
        assert!(Attitude::Neutral.yields_to_push());
        assert!(!Attitude::Hostile.yields_to_push());
    }

    #[test]
    fn directions_are_unit_steps() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!(dx != 0 || dy != 0);
        }
    }

    #[test]
    fn von_neumann_excludes_diagonals() {
        for dir in Neighborhood::VonNeumann.directions() {
            let (dx, dy) = dir.offset();
            assert!(dx == 0 || dy == 0);
        }
        assert_eq!(Neighborhood::Moore.directions().len(), 8);
    }

    #[test]
    fn enums_serialize_snake_case() {
        let json = serde_json::to_string(&TransientStatus::UnstableFooting).ok();
        assert_eq!(json.as_deref(), Some("\"unstable_footing\""));
    }
}
