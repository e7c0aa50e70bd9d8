//! Configuration loading and typed config structures for the Dormant
//! simulation.
//!
//! This module defines strongly-typed structs that mirror the YAML
//! document, and provides a loader that reads and validates it. Every
//! section is optional; missing keys fall back to the defaults below.

use std::path::Path;

use dormant_agents::MetabolismConfig;
use dormant_types::Neighborhood;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The document parsed but holds values the simulation cannot run with.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the offending setting.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Clock settings.
    #[serde(default)]
    pub time: TimeConfig,

    /// Need accrual and rest recovery rates.
    #[serde(default)]
    pub metabolism: MetabolismConfig,

    /// Hazard-avoidance movement settings.
    #[serde(default)]
    pub movement: MovementConfig,

    /// Hostile target selection settings.
    #[serde(default)]
    pub targeting: TargetingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `turns_per_minute` disagrees
    /// with the one-second turn the metabolism periods are counted in, or
    /// for an invalid metabolism section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time.turns_per_minute != SECONDS_PER_MINUTE {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "time.turns_per_minute must be {SECONDS_PER_MINUTE}: metabolism periods \
                     are counted in one-second turns"
                ),
            });
        }
        self.metabolism
            .validate()
            .map_err(|err| ConfigError::Invalid {
                reason: err.to_string(),
            })
    }
}

/// Turns per minute implied by the one-second turn.
const SECONDS_PER_MINUTE: u64 = 60;

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Turns per simulated minute. Must stay 60 while metabolism rate
    /// periods are expressed in turns.
    #[serde(default = "default_turns_per_minute")]
    pub turns_per_minute: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            turns_per_minute: default_turns_per_minute(),
        }
    }
}

/// Hazard-avoidance movement configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MovementConfig {
    /// Maximum number of agents one escape may push out of the way, one
    /// after another. Zero disables pushing.
    #[serde(default = "default_max_push_depth")]
    pub max_push_depth: u32,

    /// Which adjacent tiles an escape considers.
    #[serde(default)]
    pub neighborhood: Neighborhood,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            max_push_depth: default_max_push_depth(),
            neighborhood: Neighborhood::default(),
        }
    }
}

/// Hostile target selection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TargetingConfig {
    /// Maximum Chebyshev distance at which a target can be selected.
    #[serde(default = "default_target_range")]
    pub max_range: u32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            max_range: default_target_range(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    /// `RUST_LOG` overrides it when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_turns_per_minute() -> u64 {
    SECONDS_PER_MINUTE
}

const fn default_max_push_depth() -> u32 {
    1
}

const fn default_target_range() -> u32 {
    12
}

fn default_log_level() -> String {
    "info".to_owned()
}
