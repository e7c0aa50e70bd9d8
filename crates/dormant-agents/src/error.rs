//! Error types for the dormant-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Interval and load-state errors are caller contract violations: they mean
//! the surrounding scheduler sequenced transitions incorrectly and are not
//! meant to be retried.

use dormant_types::{AgentId, Turn};

/// Errors that can occur during agent need and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A catch-up interval ends before it starts.
    #[error("invalid catch-up interval: to ({to}) precedes from ({from})")]
    InvalidInterval {
        /// Start of the requested interval.
        from: Turn,
        /// End of the requested interval.
        to: Turn,
    },

    /// An arithmetic overflow occurred during a need computation.
    #[error("arithmetic overflow in need computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// The metabolism configuration cannot be evaluated.
    #[error("invalid metabolism config: {reason}")]
    InvalidConfig {
        /// Description of the offending setting.
        reason: String,
    },

    /// A load transition was requested for an agent that is already loaded.
    #[error("agent {0} is already loaded")]
    AlreadyLoaded(AgentId),

    /// An unload transition was requested for an agent that is already
    /// unloaded.
    #[error("agent {0} is already unloaded")]
    AlreadyUnloaded(AgentId),

    /// Agent name already exists in the manager.
    #[error("duplicate agent name: {0}")]
    DuplicateName(String),
}

impl AgentError {
    /// Shorthand for an [`AgentError::ArithmeticOverflow`] with static context.
    pub(crate) fn overflow(context: &str) -> Self {
        Self::ArithmeticOverflow {
            context: context.to_owned(),
        }
    }
}
