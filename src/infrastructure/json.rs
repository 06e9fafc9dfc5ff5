//! JSON adapter over [`ActionStats`].
//!
//! The tally itself works on decoded values. This adapter accepts and produces
//! the JSON text used on the wire:
//!
//! ```text
//! action:   {"action":"jump","time":100}
//! stats:    [{"action":"jump","avg":150},{"action":"run","avg":75}]
//! snapshot: [{"action":"jump","totaltime":300,"count":2}]
//! ```
//!
//! # Example
//! ```
//! use action_tally::ActionStats;
//! use action_tally::infrastructure::json;
//!
//! let stats = ActionStats::new("game");
//! json::add_action_json(&stats, r#"{"action":"jump", "time": 100}"#).unwrap();
//! json::add_action_json(&stats, r#"{"action":"run", "time": 75}"#).unwrap();
//! json::add_action_json(&stats, r#"{"action":"jump", "time": 200}"#).unwrap();
//!
//! assert_eq!(
//!     json::stats_json(&stats),
//!     r#"[{"action":"jump","avg":150},{"action":"run","avg":75}]"#
//! );
//! ```

use crate::application::aggregator::ActionStats;
use crate::application::ports::Storage;
use crate::domain::action::Action;
use crate::domain::error::TallyError;
use crate::domain::report::SnapshotEntry;
use crate::domain::tally::TallyEntry;
use serde::Serialize;
use serde_json::Value;

/// Decode one action event.
///
/// # Errors
/// Returns [`TallyError::InvalidEvent`] if `json` is not an object with a
/// string `action` and an integer `time`. The error carries whichever of
/// the two fields could be read, defaulting to empty/zero.
pub fn decode_action(json: &str) -> Result<Action, TallyError> {
    serde_json::from_str::<Action>(json).map_err(|_| partial_event(json))
}

fn partial_event(json: &str) -> TallyError {
    let value = serde_json::from_str::<Value>(json).unwrap_or(Value::Null);
    TallyError::InvalidEvent {
        action: value
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        time: value.get("time").and_then(Value::as_i64).unwrap_or_default(),
    }
}

/// Decode and record one action event.
///
/// # Errors
/// [`TallyError::InvalidEvent`] on a decode failure, otherwise anything
/// [`ActionStats::add_action`] returns.
pub fn add_action_json<S>(stats: &ActionStats<S>, json: &str) -> Result<(), TallyError>
where
    S: Storage<String, TallyEntry>,
{
    match decode_action(json) {
        Ok(action) => stats.record(&action),
        Err(err) => {
            stats.metrics().record_rejected(err.kind());
            Err(err)
        }
    }
}

/// Per-action averages as a JSON array, sorted by action name.
///
/// An empty tally yields `[]`.
pub fn stats_json<S>(stats: &ActionStats<S>) -> String
where
    S: Storage<String, TallyEntry>,
{
    encode_or_empty(&stats.stats(), "stats")
}

/// Raw totals and counts as a JSON array, sorted by action name.
pub fn snapshot_json<S>(stats: &ActionStats<S>) -> String
where
    S: Storage<String, TallyEntry>,
{
    encode_or_empty(&stats.take_snapshot(), "snapshot")
}

/// Decode a snapshot produced by [`snapshot_json`].
///
/// # Errors
/// Returns [`TallyError::SnapshotDecode`] if `json` is not an array of
/// snapshot entries.
pub fn decode_snapshot(json: &str) -> Result<Vec<SnapshotEntry>, TallyError> {
    serde_json::from_str(json).map_err(|err| TallyError::SnapshotDecode {
        reason: err.to_string(),
    })
}

/// Replace the contents of `stats` with a JSON snapshot.
///
/// # Errors
/// Returns [`TallyError::SnapshotDecode`] on malformed input; `stats` is
/// unchanged in that case.
pub fn load_snapshot_json<S>(stats: &ActionStats<S>, json: &str) -> Result<(), TallyError>
where
    S: Storage<String, TallyEntry>,
{
    match decode_snapshot(json) {
        Ok(entries) => stats.load_snapshot(entries),
        Err(err) => {
            stats.metrics().record_rejected(err.kind());
            Err(err)
        }
    }
}

fn encode_or_empty<T: Serialize>(records: &[T], what: &str) -> String {
    serde_json::to_string(records).unwrap_or_else(|err| {
        tracing::warn!(error = %err, what = %what, "encoding failed, returning an empty set");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;

    #[test]
    fn test_decode_action() {
        let action = decode_action(r#"{"action":"jump", "time": 100}"#).unwrap();
        assert_eq!(action, Action::new("jump", 100));
    }

    #[test]
    fn test_bad_json_reports_defaults() {
        let err = decode_action(r#"{"action":120, "time": "-100"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);
        assert_eq!(err.to_string(), "ActionStats: Action  Time 0 is invalid");
    }

    #[test]
    fn test_bad_json_keeps_readable_fields() {
        let err = decode_action(r#"{"action":"jump", "time": "soon"}"#).unwrap_err();
        assert_eq!(err.to_string(), "ActionStats: Action jump Time 0 is invalid");

        let err = decode_action("not json at all").unwrap_err();
        assert_eq!(err.to_string(), "ActionStats: Action  Time 0 is invalid");
    }

    #[test]
    fn test_time_beyond_i64_is_invalid_event() {
        let err = decode_action(r#"{"action":"jump", "time": 9223372036854775808}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);
    }

    #[test]
    fn test_add_action_json_validation_messages() {
        let stats = ActionStats::new("json");

        let err = add_action_json(&stats, r#"{"action":"jump", "time": -100}"#).unwrap_err();
        assert_eq!(err.to_string(), "ActionStats: Action jump Time -100 is invalid");

        let err = add_action_json(&stats, r#"{"action":"", "time": 100}"#).unwrap_err();
        assert_eq!(err.to_string(), "ActionStats: Action Key '' is invalid");

        let err = add_action_json(&stats, "{").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEvent);
        assert_eq!(stats.metrics().actions_invalid(), 3);
    }

    #[test]
    fn test_empty_stats_json() {
        let stats = ActionStats::new("empty");
        assert_eq!(stats_json(&stats), "[]");
        assert_eq!(snapshot_json(&stats), "[]");
    }

    #[test]
    fn test_snapshot_json_format() {
        let stats = ActionStats::new("format");
        stats.add_action("run", 75).unwrap();
        stats.add_action("jump", 100).unwrap();
        stats.add_action("jump", 200).unwrap();
        assert_eq!(
            snapshot_json(&stats),
            r#"[{"action":"jump","totaltime":300,"count":2},{"action":"run","totaltime":75,"count":1}]"#
        );
    }

    #[test]
    fn test_malformed_snapshot_leaves_stats() {
        let stats = ActionStats::new("malformed");
        stats.add_action("keep", 5).unwrap();

        let err = load_snapshot_json(&stats, "[[[[{{}}]]]]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SnapshotDecode);
        assert!(err.to_string().starts_with("ActionStats: LoadSnapShot Failed "));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.metrics().snapshots_rejected(), 1);
    }

    #[test]
    fn test_negative_count_is_malformed() {
        let err = decode_snapshot(r#"[{"action":"a","totaltime":1,"count":-1}]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SnapshotDecode);
    }
}
