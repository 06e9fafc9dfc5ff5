//! Output records: per-action averages and raw snapshots.

use crate::domain::tally::TallyEntry;
use serde::{Deserialize, Serialize};

/// Average time for one action, as returned by [`ActionStats::stats`](crate::ActionStats::stats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAverage {
    /// Normalized action name
    pub action: String,
    /// `total_time / count`, truncated toward zero
    pub avg: i64,
}

impl ActionAverage {
    /// Derive the average for an entry.
    pub fn from_entry(action: String, entry: &TallyEntry) -> Self {
        Self {
            action,
            avg: entry.average(),
        }
    }
}

/// Lossless record of one stored entry, used for export and reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Normalized action name
    pub action: String,
    /// Sum of accepted times
    #[serde(rename = "totaltime")]
    pub total_time: i64,
    /// Number of accepted events
    pub count: u64,
}

impl SnapshotEntry {
    /// Create a snapshot record.
    pub fn new(action: impl Into<String>, total_time: i64, count: u64) -> Self {
        Self {
            action: action.into(),
            total_time,
            count,
        }
    }

    /// Snapshot record for a stored entry.
    pub fn from_entry(action: String, entry: &TallyEntry) -> Self {
        Self {
            action,
            total_time: entry.total_time,
            count: entry.count,
        }
    }

    /// The stored entry this record describes.
    pub fn to_entry(&self) -> TallyEntry {
        TallyEntry::from_parts(self.total_time, self.count)
    }
}
