//! Core entity structs for the Dormant simulation core.
//!
//! The [`Agent`] is the only entity both subsystems share: the catch-up
//! integrator mutates its needs and load state, the movement resolver
//! mutates its position and transient status.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{Activity, Attitude, Direction, FieldKind, TransientStatus};
use crate::ids::{AgentId, VehicleId};

/// Simulation time in turns. One turn is one simulated second.
pub type Turn = u64;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// An absolute map coordinate. `y` grows southward, `z` is the vertical level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Vertical level.
    pub z: i32,
}

impl Point {
    /// Create a point on the given level.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this point on its own level. Returns `None` on coordinate
    /// overflow.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z,
        })
    }

    /// The neighboring point one step in `direction`.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Chebyshev (king-move) distance on the same level. Points on different
    /// levels are `None`.
    pub fn chebyshev_distance(self, other: Self) -> Option<u32> {
        if self.z != other.z {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }
}

impl core::fmt::Display for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Needs
// ---------------------------------------------------------------------------

/// Survival needs. Higher is worse for every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Needs {
    /// Accumulated hunger.
    pub hunger: u32,
    /// Accumulated thirst.
    pub thirst: u32,
    /// Accumulated fatigue.
    pub fatigue: u32,
}

/// Progress toward the next whole point of each need.
///
/// Values are numerators over a fixed residue scale chosen by the
/// metabolism configuration, and stay in `[0, scale)`. Carrying the exact
/// remainder between updates lets many short updates add up to the same
/// integer result as one long update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeedResidue {
    /// Partial hunger point.
    pub hunger: Decimal,
    /// Partial thirst point.
    pub thirst: Decimal,
    /// Partial fatigue point.
    pub fatigue: Decimal,
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

/// Ordered record of activity transitions, keyed by the turn at which each
/// new activity began.
///
/// An agent with an empty log is treated as [`Activity::Awake`] forever.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    transitions: BTreeMap<Turn, Activity>,
}

impl ActivityLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            transitions: BTreeMap::new(),
        }
    }

    /// Record that `activity` begins at `at`, replacing any transition
    /// already recorded for that turn.
    pub fn record(&mut self, at: Turn, activity: Activity) {
        self.transitions.insert(at, activity);
    }

    /// Forget every transition at or after `at`.
    pub fn truncate_from(&mut self, at: Turn) {
        drop(self.transitions.split_off(&at));
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// The activity in effect at `at`.
    ///
    /// Before the first recorded transition the agent is awake.
    pub fn activity_at(&self, at: Turn) -> Activity {
        self.transitions
            .range(..=at)
            .next_back()
            .map_or(Activity::Awake, |(_, activity)| *activity)
    }

    /// The turn at which the run of identical activity containing `at`
    /// began, or `None` if `at` precedes every recorded transition.
    pub fn run_started_at(&self, at: Turn) -> Option<Turn> {
        let current = self.activity_at(at);
        let mut start = None;
        for (turn, activity) in self.transitions.range(..=at).rev() {
            if *activity != current {
                break;
            }
            start = Some(*turn);
        }
        start
    }

    /// Transitions strictly after `from` and strictly before `to`.
    pub fn transitions_between(
        &self,
        from: Turn,
        to: Turn,
    ) -> impl Iterator<Item = (Turn, Activity)> + '_ {
        let lower = from.saturating_add(1);
        self.transitions
            .range(lower..to.max(lower))
            .map(|(turn, activity)| (*turn, *activity))
    }

    /// Drop transitions that can no longer affect activity at or after
    /// `before`. The transition in effect at `before` is kept together with
    /// the start of its run so ramp offsets stay correct.
    pub fn prune_before(&mut self, before: Turn) {
        let keep_from = self.run_started_at(before).unwrap_or(before);
        if self
            .transitions
            .first_key_value()
            .is_some_and(|(first, _)| *first < keep_from)
        {
            self.transitions = self.transitions.split_off(&keep_from);
        }
    }
}

// ---------------------------------------------------------------------------
// Load state and vehicles
// ---------------------------------------------------------------------------

/// Whether an agent is inside the actively simulated region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LoadState {
    /// Simulated tick by tick since the given turn.
    Loaded {
        /// Turn of the last load transition.
        since: Turn,
    },
    /// Off-screen since the given turn; time elapses in bulk on reload.
    Unloaded {
        /// Turn of the last unload transition.
        since: Turn,
    },
}

impl LoadState {
    /// Whether the agent is currently loaded.
    pub const fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Turn of the most recent transition.
    pub const fn since(self) -> Turn {
        match self {
            Self::Loaded { since } | Self::Unloaded { since } => since,
        }
    }
}

/// A seat in a vehicle that an agent has boarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleSeat {
    /// The vehicle owning the seat.
    pub vehicle: VehicleId,
    /// Map location of the seat.
    pub position: Point,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// An autonomous simulated character (or the player) with a position,
/// survival needs, and transient status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current map location.
    pub position: Point,
    /// Survival needs.
    pub needs: Needs,
    /// Fractional need progress carried between updates.
    pub residue: NeedResidue,
    /// Activity transitions used to partition unloaded intervals.
    pub activity_log: ActivityLog,
    /// Attitude toward the player.
    pub attitude: Attitude,
    /// Whether the agent vacates its tile when another agent pushes it.
    pub pushable: bool,
    /// Whether this agent is the player character.
    pub is_player: bool,
    /// Boarded vehicle seat, if any. Seated agents ignore terrain hazards.
    pub vehicle: Option<VehicleSeat>,
    /// Tile-derived short-lived statuses.
    pub transient: BTreeSet<TransientStatus>,
    /// Field kinds that do not harm this agent.
    pub immunities: BTreeSet<FieldKind>,
    /// Loaded/unloaded state and transition turn.
    pub load_state: LoadState,
    /// End of a committed multi-turn action; movement is not resolved
    /// before this turn.
    pub busy_until: Option<Turn>,
}

impl Agent {
    /// The activity in effect at `at`.
    pub fn activity_at(&self, at: Turn) -> Activity {
        self.activity_log.activity_at(at)
    }

    /// Put the agent to sleep at `at` for `duration` turns.
    ///
    /// Returns `None` if the wake-up turn overflows.
    pub fn fall_asleep(&mut self, at: Turn, duration: Turn) -> Option<Turn> {
        let wakes_at = at.checked_add(duration)?;
        self.activity_log.record(at, Activity::Resting);
        self.activity_log.record(wakes_at, Activity::Awake);
        Some(wakes_at)
    }

    /// Wake the agent at `at`, discarding any later scheduled transitions.
    pub fn wake_up(&mut self, at: Turn) {
        self.activity_log.truncate_from(at);
        self.activity_log.record(at, Activity::Awake);
    }

    /// Whether the agent carries the given transient status.
    pub fn has_status(&self, status: TransientStatus) -> bool {
        self.transient.contains(&status)
    }

    /// Whether the agent is committed to another action at `now`.
    pub fn is_busy(&self, now: Turn) -> bool {
        self.busy_until.is_some_and(|until| now < until)
    }
}
