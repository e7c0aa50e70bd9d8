//! Activity history: partitioning an unloaded interval into segments of
//! constant activity.
//!
//! The catch-up integrator never walks turns one by one. It asks an
//! [`ActivityHistory`] for the contiguous runs of [`Activity`] covering the
//! interval and evaluates each run in closed form. The default
//! implementation, [`LoggedActivity`], reads the agent's own
//! [`ActivityLog`](dormant_types::ActivityLog).

use dormant_types::{Activity, Agent, Turn};

/// A contiguous run of constant activity inside a catch-up interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySegment {
    /// First turn of the segment.
    pub start: Turn,
    /// One past the last turn of the segment.
    pub end: Turn,
    /// Activity held for the whole segment.
    pub activity: Activity,
    /// Turns of the same activity that had already elapsed when the segment
    /// began. Rest recovery uses this to continue its ramp instead of
    /// restarting at every segment boundary.
    pub run_offset: u64,
}

impl ActivitySegment {
    /// Length of the segment in turns.
    pub const fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Restrict the segment to `[from, to)`, advancing `run_offset` by
    /// whatever was cut from the front. Returns `None` if nothing remains.
    pub fn clip(self, from: Turn, to: Turn) -> Option<Self> {
        let start = self.start.max(from);
        let end = self.end.min(to);
        if start >= end {
            return None;
        }
        let trimmed = start.saturating_sub(self.start);
        Some(Self {
            start,
            end,
            activity: self.activity,
            run_offset: self.run_offset.saturating_add(trimmed),
        })
    }
}

/// Source of constant-activity segments for an agent over a time range.
///
/// Implementations must return segments in ascending order. The integrator
/// clips them to the requested range and ignores gaps, so an implementation
/// that knows nothing may return a single segment.
pub trait ActivityHistory {
    /// Segments overlapping `[from, to)` for `agent`.
    fn segments(&self, agent: &Agent, from: Turn, to: Turn) -> Vec<ActivitySegment>;
}

/// [`ActivityHistory`] backed by the agent's recorded activity log.
///
/// With an empty log the whole interval is one awake segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedActivity;

impl ActivityHistory for LoggedActivity {
    fn segments(&self, agent: &Agent, from: Turn, to: Turn) -> Vec<ActivitySegment> {
        if from >= to {
            return Vec::new();
        }

        let log = &agent.activity_log;
        if log.is_empty() {
            return vec![ActivitySegment {
                start: from,
                end: to,
                activity: agent.activity_at(from),
                run_offset: 0,
            }];
        }

        let mut segments = Vec::new();
        let mut start = from;
        let mut activity = log.activity_at(from);
        let mut run_offset = log
            .run_started_at(from)
            .map_or(0, |began| from.saturating_sub(began));

        for (turn, next) in log.transitions_between(from, to) {
            if next == activity {
                continue;
            }
            segments.push(ActivitySegment {
                start,
                end: turn,
                activity,
                run_offset,
            });
            start = turn;
            activity = next;
            run_offset = 0;
        }

        segments.push(ActivitySegment {
            start,
            end: to,
            activity,
            run_offset,
        });
        segments
    }
}

/// [`ActivityHistory`] that reports one fixed activity for every interval.
///
/// Useful when the collaborator has no history at all but knows what the
/// agent was doing when it left the simulated region.
#[derive(Debug, Clone, Copy)]
pub struct ConstantActivity(pub Activity);

impl ActivityHistory for ConstantActivity {
    fn segments(&self, _agent: &Agent, from: Turn, to: Turn) -> Vec<ActivitySegment> {
        if from >= to {
            return Vec::new();
        }
        vec![ActivitySegment {
            start: from,
            end: to,
            activity: self.0,
            run_offset: 0,
        }]
    }
}
