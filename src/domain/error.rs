//! Errors returned by tally operations.
//!
//! Every error is deterministic and caller-correctable. No operation that
//! returns one of these has mutated the store.

use std::fmt;

/// Fieldless classification of a [`TallyError`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The upstream decoder could not produce an action/time pair
    InvalidEvent,
    /// Normalized action name is too short or too long
    InvalidAction,
    /// Time is outside the configured bounds
    InvalidTime,
    /// A new action would exceed the distinct action limit
    CapacityExceeded,
    /// Accumulating the time would overflow the running total
    Overflow,
    /// Snapshot input could not be loaded
    SnapshotDecode,
}

/// Error returned when an action cannot be tallied or a snapshot cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    /// The raw event could not be decoded.
    ///
    /// Fields hold whatever was decoded before the failure, defaulting to
    /// empty/zero.
    InvalidEvent {
        /// Decoded action name, if any
        action: String,
        /// Decoded time, if any
        time: i64,
    },
    /// The normalized action name length is outside the configured range
    InvalidAction {
        /// Action name as supplied by the caller
        action: String,
    },
    /// The time is outside the configured range
    InvalidTime {
        /// Action name as supplied by the caller
        action: String,
        /// Rejected time
        time: i64,
    },
    /// The store already tracks the maximum number of distinct actions
    CapacityExceeded {
        /// Action name as supplied by the caller
        action: String,
        /// Configured limit
        max_actions: usize,
    },
    /// The running total (or count) for this action would overflow
    Overflow {
        /// Action name as supplied by the caller
        action: String,
    },
    /// Snapshot input was malformed
    SnapshotDecode {
        /// Why decoding failed
        reason: String,
    },
}

impl TallyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TallyError::InvalidEvent { .. } => ErrorKind::InvalidEvent,
            TallyError::InvalidAction { .. } => ErrorKind::InvalidAction,
            TallyError::InvalidTime { .. } => ErrorKind::InvalidTime,
            TallyError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            TallyError::Overflow { .. } => ErrorKind::Overflow,
            TallyError::SnapshotDecode { .. } => ErrorKind::SnapshotDecode,
        }
    }
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyError::InvalidEvent { action, time } => {
                write!(f, "ActionStats: Action {} Time {} is invalid", action, time)
            }
            TallyError::InvalidAction { action } => {
                write!(f, "ActionStats: Action Key '{}' is invalid", action)
            }
            TallyError::InvalidTime { action, time } => {
                write!(f, "ActionStats: Action {} Time {} is invalid", action, time)
            }
            TallyError::CapacityExceeded {
                action,
                max_actions,
            } => write!(
                f,
                "ActionStats: Action {} MaxActions {} are exceeded",
                action, max_actions
            ),
            TallyError::Overflow { action } => {
                write!(f, "ActionStats: Action {} exceeds MaxInt64", action)
            }
            TallyError::SnapshotDecode { reason } => {
                write!(f, "ActionStats: LoadSnapShot Failed {}", reason)
            }
        }
    }
}

impl std::error::Error for TallyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TallyError::InvalidTime {
            action: "jump".to_string(),
            time: -100,
        };
        assert_eq!(err.to_string(), "ActionStats: Action jump Time -100 is invalid");

        let err = TallyError::InvalidEvent {
            action: String::new(),
            time: 0,
        };
        assert_eq!(err.to_string(), "ActionStats: Action  Time 0 is invalid");

        let err = TallyError::InvalidAction {
            action: "".to_string(),
        };
        assert_eq!(err.to_string(), "ActionStats: Action Key '' is invalid");

        let err = TallyError::CapacityExceeded {
            action: "test8".to_string(),
            max_actions: 8,
        };
        assert!(err.to_string().contains("MaxActions 8"));
    }

    #[test]
    fn test_kind() {
        let err = TallyError::Overflow {
            action: "jump".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Overflow);

        let err = TallyError::SnapshotDecode {
            reason: "eof".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SnapshotDecode);
    }
}
