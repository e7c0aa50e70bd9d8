//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Agents and vehicles get distinct id types so one can never be passed
//! where the other is expected. Ids are UUID v7. Displayed ids carry a
//! kind prefix (`agent:`, `vehicle:`) to keep log lines unambiguous.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident => $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent (NPC or player) in the simulation.
    AgentId => "agent"
}

define_id! {
    /// Unique identifier for a vehicle whose seats can exempt agents from
    /// terrain hazards.
    VehicleId => "vehicle"
}
