//! Observability metrics for action tallying.
//!
//! Counts what happened to each ingested action so callers can monitor
//! rejection rates without the core logging every failure.

use crate::domain::error::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking ingestion outcomes.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Actions folded into the store
    actions_accepted: AtomicU64,
    /// Actions that failed decoding or validation
    actions_invalid: AtomicU64,
    /// New actions refused because the store was full
    capacity_rejections: AtomicU64,
    /// Actions refused because the running total would overflow
    overflow_rejections: AtomicU64,
    /// Successful snapshot loads
    snapshots_loaded: AtomicU64,
    /// Snapshot loads refused as malformed
    snapshots_rejected: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Record an accepted action.
    pub(crate) fn record_accepted(&self) {
        self.inner.actions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected action by the kind of error that rejected it.
    pub(crate) fn record_rejected(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::CapacityExceeded => &self.inner.capacity_rejections,
            ErrorKind::Overflow => &self.inner.overflow_rejections,
            ErrorKind::SnapshotDecode => &self.inner.snapshots_rejected,
            ErrorKind::InvalidEvent | ErrorKind::InvalidAction | ErrorKind::InvalidTime => {
                &self.inner.actions_invalid
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed snapshot load.
    pub(crate) fn record_snapshot_loaded(&self) {
        self.inner.snapshots_loaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of accepted actions.
    pub fn actions_accepted(&self) -> u64 {
        self.inner.actions_accepted.load(Ordering::Relaxed)
    }

    /// Get the number of actions rejected by decoding or validation.
    pub fn actions_invalid(&self) -> u64 {
        self.inner.actions_invalid.load(Ordering::Relaxed)
    }

    /// Get the number of new actions refused at capacity.
    pub fn capacity_rejections(&self) -> u64 {
        self.inner.capacity_rejections.load(Ordering::Relaxed)
    }

    /// Get the number of actions refused on overflow.
    pub fn overflow_rejections(&self) -> u64 {
        self.inner.overflow_rejections.load(Ordering::Relaxed)
    }

    /// Get the number of snapshots loaded.
    pub fn snapshots_loaded(&self) -> u64 {
        self.inner.snapshots_loaded.load(Ordering::Relaxed)
    }

    /// Get the number of snapshots refused as malformed.
    pub fn snapshots_rejected(&self) -> u64 {
        self.inner.snapshots_rejected.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            actions_accepted: self.actions_accepted(),
            actions_invalid: self.actions_invalid(),
            capacity_rejections: self.capacity_rejections(),
            overflow_rejections: self.overflow_rejections(),
            snapshots_loaded: self.snapshots_loaded(),
            snapshots_rejected: self.snapshots_rejected(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.actions_accepted.store(0, Ordering::Relaxed);
        self.inner.actions_invalid.store(0, Ordering::Relaxed);
        self.inner.capacity_rejections.store(0, Ordering::Relaxed);
        self.inner.overflow_rejections.store(0, Ordering::Relaxed);
        self.inner.snapshots_loaded.store(0, Ordering::Relaxed);
        self.inner.snapshots_rejected.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Actions folded into the store
    pub actions_accepted: u64,
    /// Actions that failed decoding or validation
    pub actions_invalid: u64,
    /// New actions refused because the store was full
    pub capacity_rejections: u64,
    /// Actions refused because the running total would overflow
    pub overflow_rejections: u64,
    /// Successful snapshot loads
    pub snapshots_loaded: u64,
    /// Snapshot loads refused as malformed
    pub snapshots_rejected: u64,
}

impl MetricsSnapshot {
    /// Total actions rejected for any reason.
    pub fn actions_rejected(&self) -> u64 {
        self.actions_invalid
            .saturating_add(self.capacity_rejections)
            .saturating_add(self.overflow_rejections)
    }

    /// Total actions seen (accepted + rejected).
    pub fn total_actions(&self) -> u64 {
        self.actions_accepted.saturating_add(self.actions_rejected())
    }

    /// Fraction of actions rejected (0.0 to 1.0).
    ///
    /// Returns 0.0 if no actions have been processed.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total_actions();
        if total == 0 {
            0.0
        } else {
            self.actions_rejected() as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initial_state() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_rejected_by_kind() {
        let metrics = Metrics::new();
        metrics.record_rejected(ErrorKind::InvalidAction);
        metrics.record_rejected(ErrorKind::InvalidTime);
        metrics.record_rejected(ErrorKind::InvalidEvent);
        metrics.record_rejected(ErrorKind::CapacityExceeded);
        metrics.record_rejected(ErrorKind::Overflow);
        metrics.record_rejected(ErrorKind::Overflow);
        metrics.record_rejected(ErrorKind::SnapshotDecode);

        assert_eq!(metrics.actions_invalid(), 3);
        assert_eq!(metrics.snapshots_rejected(), 1);
        assert_eq!(metrics.capacity_rejections(), 1);
        assert_eq!(metrics.overflow_rejections(), 2);
        assert_eq!(metrics.snapshot().actions_rejected(), 6);
    }

    #[test]
    fn test_rejection_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_rejected(ErrorKind::Overflow);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_actions(), 4);
        assert!((snapshot.rejection_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_accepted();
        metrics.record_rejected(ErrorKind::CapacityExceeded);
        metrics.record_snapshot_loaded();

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_metrics_clone_shares_counters() {
        let metrics1 = Metrics::new();
        metrics1.record_accepted();

        let metrics2 = metrics1.clone();
        metrics2.record_accepted();

        assert_eq!(metrics1.actions_accepted(), 2);
        assert_eq!(metrics2.actions_accepted(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let mut handles = vec![];

        for _ in 0..10 {
            let m = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    m.record_accepted();
                    m.record_rejected(ErrorKind::InvalidTime);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.actions_accepted(), 1000);
        assert_eq!(metrics.actions_invalid(), 1000);
    }
}
