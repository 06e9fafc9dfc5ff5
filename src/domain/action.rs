//! Incoming action events and their normalization.
//!
//! Normalization runs before the store is touched, so a malformed action
//! never contends for the store lock.

use crate::domain::config::TallyConfig;
use crate::domain::error::TallyError;
use serde::{Deserialize, Serialize};

/// A single "action occurred, taking `time`" event as decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Raw action name
    pub action: String,
    /// Raw duration
    pub time: i64,
}

impl Action {
    /// Create a new action event.
    pub fn new(action: impl Into<String>, time: i64) -> Self {
        Self {
            action: action.into(),
            time,
        }
    }
}

/// An action that passed validation, keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAction {
    key: String,
    time: i64,
}

impl NormalizedAction {
    /// Trim, optionally lowercase, and bounds-check an action.
    ///
    /// Length bounds are checked against the normalized name in bytes; time
    /// bounds against the raw time. Both ranges are inclusive.
    ///
    /// # Errors
    /// - [`TallyError::InvalidAction`] if the normalized name is too short or too long
    /// - [`TallyError::InvalidTime`] if the time is out of range
    pub fn new(config: &TallyConfig, action: &str, time: i64) -> Result<Self, TallyError> {
        let trimmed = action.trim_matches(|c: char| config.is_trimmed(c));
        let key = if config.lowercase_actions {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };

        if key.len() < config.min_action_length || key.len() > config.max_action_length {
            return Err(TallyError::InvalidAction {
                action: action.to_string(),
            });
        }

        if time < config.min_time || time > config.max_time {
            return Err(TallyError::InvalidTime {
                action: action.to_string(),
                time,
            });
        }

        Ok(Self { key, time })
    }

    /// The normalized action name used as the store key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Split into key and time.
    pub fn into_parts(self) -> (String, i64) {
        (self.key, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    fn kind(result: Result<NormalizedAction, TallyError>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_trim_and_lowercase() {
        let config = TallyConfig::default();
        let a = NormalizedAction::new(&config, " Jump ", 10).unwrap();
        let b = NormalizedAction::new(&config, "jump", 10).unwrap();
        assert_eq!(a.key(), "jump");
        assert_eq!(a, b);

        let wrapped = NormalizedAction::new(&config, "{<\"`'RUN'`\">}", 5).unwrap();
        assert_eq!(wrapped.into_parts(), ("run".to_string(), 5));
    }

    #[test]
    fn test_inner_characters_are_kept() {
        let config = TallyConfig::default();
        let action = NormalizedAction::new(&config, " double jump ", 1).unwrap();
        assert_eq!(action.key(), "double jump");
    }

    #[test]
    fn test_case_preserved_when_disabled() {
        let config = TallyConfig {
            lowercase_actions: false,
            ..TallyConfig::default()
        };
        let action = NormalizedAction::new(&config, "Jump", 1).unwrap();
        assert_eq!(action.key(), "Jump");
    }

    #[test]
    fn test_length_bounds() {
        let config = TallyConfig::default();
        assert_eq!(kind(NormalizedAction::new(&config, "", 1)), ErrorKind::InvalidAction);
        assert_eq!(
            kind(NormalizedAction::new(&config, "  {} ", 1)),
            ErrorKind::InvalidAction
        );
        assert_eq!(
            kind(NormalizedAction::new(
                &config,
                "THIS IS OVER TWENTY CHARACTERS",
                100
            )),
            ErrorKind::InvalidAction
        );

        // Exactly at both bounds is accepted.
        assert!(NormalizedAction::new(&config, "a", 1).is_ok());
        assert!(NormalizedAction::new(&config, &"a".repeat(20), 1).is_ok());
        assert_eq!(
            kind(NormalizedAction::new(&config, &"a".repeat(21), 1)),
            ErrorKind::InvalidAction
        );
    }

    #[test]
    fn test_length_checked_after_trimming() {
        let config = TallyConfig::default();
        let padded = format!("   {}   ", "a".repeat(20));
        assert!(NormalizedAction::new(&config, &padded, 1).is_ok());
    }

    #[test]
    fn test_time_bounds() {
        let config = TallyConfig::default();
        assert_eq!(
            kind(NormalizedAction::new(&config, "jump", -100)),
            ErrorKind::InvalidTime
        );
        assert_eq!(
            kind(NormalizedAction::new(&config, "jump", (1 << 60) - 1)),
            ErrorKind::InvalidTime
        );
        assert!(NormalizedAction::new(&config, "jump", 0).is_ok());
        assert!(NormalizedAction::new(&config, "jump", config.max_time).is_ok());
        assert_eq!(
            kind(NormalizedAction::new(&config, "jump", config.max_time + 1)),
            ErrorKind::InvalidTime
        );
    }

    #[test]
    fn test_error_reports_raw_action() {
        let config = TallyConfig::default();
        let err = NormalizedAction::new(&config, "THIS IS OVER TWENTY CHARACTERS", 100)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "ActionStats: Action Key 'THIS IS OVER TWENTY CHARACTERS' is invalid"
        );
    }

    #[test]
    fn test_key_checked_before_time() {
        let config = TallyConfig::default();
        assert_eq!(kind(NormalizedAction::new(&config, "", -1)), ErrorKind::InvalidAction);
    }
}
