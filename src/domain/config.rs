//! Validation and normalization policy for incoming actions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default minimum action name length (bytes).
pub const DEFAULT_MIN_ACTION_LENGTH: usize = 1;
/// Default maximum action name length (bytes).
pub const DEFAULT_MAX_ACTION_LENGTH: usize = 20;
/// Default minimum accepted time.
pub const DEFAULT_MIN_TIME: i64 = 0;
/// Default maximum accepted time: one day in milliseconds.
pub const DEFAULT_MAX_TIME: i64 = 24 * 3600 * 1000;
/// Default limit on distinct tracked actions.
pub const DEFAULT_MAX_ACTIONS: usize = 1_000_000;
/// Characters stripped from both ends of an action name by default.
pub const DEFAULT_TRIM_CHARS: &str = " {}<>\"'`";

/// Error returned when a configuration is internally inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_actions` must be greater than zero
    ZeroMaxActions,
    /// `min_action_length` is greater than `max_action_length`
    InvertedActionLength {
        /// Configured minimum
        min: usize,
        /// Configured maximum
        max: usize,
    },
    /// `min_time` is greater than `max_time`
    InvertedTimeRange {
        /// Configured minimum
        min: i64,
        /// Configured maximum
        max: i64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMaxActions => write!(f, "max_actions must be greater than 0"),
            ConfigError::InvertedActionLength { min, max } => write!(
                f,
                "min_action_length ({}) must not exceed max_action_length ({})",
                min, max
            ),
            ConfigError::InvertedTimeRange { min, max } => {
                write!(f, "min_time ({}) must not exceed max_time ({})", min, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Policy applied to every action before it reaches the store.
///
/// Owned by a single [`ActionStats`](crate::ActionStats) instance. Fields are
/// public so the owner can adjust them between bursts of traffic through
/// `config_mut()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Normalized action names must be at least this long
    pub min_action_length: usize,
    /// Normalized action names must be at most this long
    pub max_action_length: usize,
    /// Times must be greater than or equal to this
    pub min_time: i64,
    /// Times must be less than or equal to this
    pub max_time: i64,
    /// Upper bound on distinct actions held at once
    pub max_actions: usize,
    /// Characters trimmed from both ends of an action name
    pub trim_chars: BTreeSet<char>,
    /// Lowercase action names after trimming
    pub lowercase_actions: bool,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            min_action_length: DEFAULT_MIN_ACTION_LENGTH,
            max_action_length: DEFAULT_MAX_ACTION_LENGTH,
            min_time: DEFAULT_MIN_TIME,
            max_time: DEFAULT_MAX_TIME,
            max_actions: DEFAULT_MAX_ACTIONS,
            trim_chars: DEFAULT_TRIM_CHARS.chars().collect(),
            lowercase_actions: true,
        }
    }
}

impl TallyConfig {
    /// Check that the bounds are coherent.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_actions == 0 {
            return Err(ConfigError::ZeroMaxActions);
        }
        if self.min_action_length > self.max_action_length {
            return Err(ConfigError::InvertedActionLength {
                min: self.min_action_length,
                max: self.max_action_length,
            });
        }
        if self.min_time > self.max_time {
            return Err(ConfigError::InvertedTimeRange {
                min: self.min_time,
                max: self.max_time,
            });
        }
        Ok(())
    }

    /// Whether `c` is stripped from the ends of action names.
    pub fn is_trimmed(&self, c: char) -> bool {
        self.trim_chars.contains(&c)
    }
}
