//! The action tally engine.
//!
//! [`ActionStats`] validates incoming actions, folds them into a shared
//! [`Storage`] and derives per-action averages on demand. It can also export
//! and reload its raw state for persistence elsewhere.

use crate::application::metrics::Metrics;
use crate::application::ports::{Storage, Upsert};
use crate::domain::action::{Action, NormalizedAction};
use crate::domain::config::{ConfigError, TallyConfig};
use crate::domain::error::TallyError;
use crate::domain::report::{ActionAverage, SnapshotEntry};
use crate::domain::tally::TallyEntry;
use crate::infrastructure::storage::LockedStorage;

use std::collections::BTreeSet;

/// Default storage backend: a single mutex over the whole map.
pub type DefaultStorage = LockedStorage<String, TallyEntry>;

/// Concurrent tally of action durations.
///
/// Share across threads with `Arc<ActionStats>`; every operation takes
/// `&self`. Configuration is changed through [`config_mut`](Self::config_mut),
/// which needs exclusive access, so it cannot race with ingestion on the
/// same instance.
///
/// # Example
/// ```
/// use action_tally::ActionStats;
///
/// let stats = ActionStats::new("player");
/// stats.add_action("jump", 100).unwrap();
/// stats.add_action("run", 75).unwrap();
/// stats.add_action(" Jump ", 200).unwrap();
///
/// let report = stats.stats();
/// assert_eq!(report[0].action, "jump");
/// assert_eq!(report[0].avg, 150);
/// assert_eq!(report[1].action, "run");
/// assert_eq!(report[1].avg, 75);
/// ```
#[derive(Debug)]
pub struct ActionStats<S = DefaultStorage>
where
    S: Storage<String, TallyEntry>,
{
    name: String,
    config: TallyConfig,
    storage: S,
    metrics: Metrics,
}

impl ActionStats<DefaultStorage> {
    /// Create a tally with the default configuration and storage.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_storage(name, TallyConfig::default(), LockedStorage::new())
    }

    /// Create a builder for a custom tally.
    pub fn builder() -> ActionStatsBuilder<DefaultStorage> {
        ActionStatsBuilder::new()
    }
}

impl Default for ActionStats<DefaultStorage> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<S> ActionStats<S>
where
    S: Storage<String, TallyEntry>,
{
    /// Create a tally over an explicit storage backend.
    ///
    /// The configuration is used as given; see [`ActionStatsBuilder::build`]
    /// for a validated construction path.
    pub fn with_storage(name: impl Into<String>, config: TallyConfig, storage: S) -> Self {
        Self {
            name: name.into(),
            config,
            storage,
            metrics: Metrics::new(),
        }
    }

    /// Name given to this collection of stats.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current configuration.
    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Changes apply to subsequent ingestion only; entries already stored are
    /// not re-validated.
    pub fn config_mut(&mut self) -> &mut TallyConfig {
        &mut self.config
    }

    /// Ingestion metrics for this tally.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Number of distinct actions currently tracked.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no actions are tracked.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Record one occurrence of `action` taking `time`.
    ///
    /// The action name is trimmed and, by default, lowercased before use as a
    /// key. Validation runs before the store is locked.
    ///
    /// # Errors
    /// - [`TallyError::InvalidAction`] if the normalized name is too short or too long
    /// - [`TallyError::InvalidTime`] if `time` is out of range
    /// - [`TallyError::CapacityExceeded`] if `action` is new and `max_actions`
    ///   distinct actions are already tracked
    /// - [`TallyError::Overflow`] if the running total would exceed `i64::MAX`
    ///
    /// On error the store is unchanged.
    pub fn add_action(&self, action: &str, time: i64) -> Result<(), TallyError> {
        let result = self.try_add_action(action, time);
        match &result {
            Ok(()) => self.metrics.record_accepted(),
            Err(err) => self.metrics.record_rejected(err.kind()),
        }
        result
    }

    /// Record a decoded [`Action`].
    ///
    /// # Errors
    /// Same as [`add_action`](Self::add_action).
    pub fn record(&self, action: &Action) -> Result<(), TallyError> {
        self.add_action(&action.action, action.time)
    }

    fn try_add_action(&self, action: &str, time: i64) -> Result<(), TallyError> {
        let (key, time) = NormalizedAction::new(&self.config, action, time)?.into_parts();
        let max_actions = self.config.max_actions;

        match self
            .storage
            .upsert(key, max_actions, TallyEntry::first(time), |entry| {
                entry.accumulate(time)
            }) {
            Upsert::Inserted => {
                tracing::trace!(action = %action, "new action tracked");
                Ok(())
            }
            Upsert::Updated => Ok(()),
            Upsert::AtCapacity => Err(TallyError::CapacityExceeded {
                action: action.to_string(),
                max_actions,
            }),
            Upsert::Rejected => Err(TallyError::Overflow {
                action: action.to_string(),
            }),
        }
    }

    /// Average time per action, sorted ascending by action name.
    ///
    /// Entries are copied under the store lock; averages are computed after
    /// it is released. An empty tally yields an empty vector.
    pub fn stats(&self) -> Vec<ActionAverage> {
        let mut report: Vec<ActionAverage> = self
            .storage
            .snapshot()
            .into_iter()
            .map(|(action, entry)| ActionAverage::from_entry(action, &entry))
            .collect();
        report.sort_unstable_by(|a, b| a.action.cmp(&b.action));
        report
    }

    /// Export the raw totals and counts, sorted ascending by action name.
    pub fn take_snapshot(&self) -> Vec<SnapshotEntry> {
        let mut snapshot: Vec<SnapshotEntry> = self
            .storage
            .snapshot()
            .into_iter()
            .map(|(action, entry)| SnapshotEntry::from_entry(action, &entry))
            .collect();
        snapshot.sort_unstable_by(|a, b| a.action.cmp(&b.action));
        snapshot
    }

    /// Replace the whole tally with previously exported entries.
    ///
    /// Entries are trusted: names and totals are not re-validated against the
    /// current configuration. If an action appears more than once, the last
    /// occurrence wins. The replacement is atomic; concurrent readers see
    /// either the old or the new contents.
    ///
    /// # Errors
    /// Returns [`TallyError::SnapshotDecode`] if any entry has a zero count.
    /// The tally is unchanged in that case.
    pub fn load_snapshot<I>(&self, entries: I) -> Result<(), TallyError>
    where
        I: IntoIterator<Item = SnapshotEntry>,
    {
        let entries = match collect_snapshot(entries) {
            Ok(entries) => entries,
            Err(err) => {
                self.metrics.record_rejected(err.kind());
                return Err(err);
            }
        };

        let loaded = entries.len();
        self.storage.replace(entries);
        self.metrics.record_snapshot_loaded();
        tracing::debug!(stats = %self.name, entries = loaded, "snapshot loaded");
        Ok(())
    }

    /// Discard every tracked action.
    pub fn clear(&self) {
        self.storage.clear();
        tracing::debug!(stats = %self.name, "tally cleared");
    }
}

fn collect_snapshot<I>(entries: I) -> Result<Vec<(String, TallyEntry)>, TallyError>
where
    I: IntoIterator<Item = SnapshotEntry>,
{
    entries
        .into_iter()
        .map(|snap| {
            if snap.count == 0 {
                return Err(TallyError::SnapshotDecode {
                    reason: format!("action '{}' has a zero count", snap.action),
                });
            }
            let entry = snap.to_entry();
            Ok((snap.action, entry))
        })
        .collect()
}

/// Builder for constructing an [`ActionStats`].
#[derive(Debug)]
pub struct ActionStatsBuilder<S> {
    name: String,
    config: TallyConfig,
    storage: S,
}

impl ActionStatsBuilder<DefaultStorage> {
    fn new() -> Self {
        Self {
            name: String::new(),
            config: TallyConfig::default(),
            storage: LockedStorage::new(),
        }
    }
}

impl<S> ActionStatsBuilder<S>
where
    S: Storage<String, TallyEntry>,
{
    /// Set the name of this collection of stats.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: TallyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum number of distinct actions to track.
    ///
    /// The limit is inclusive: with a limit of 8, eight distinct actions are
    /// accepted and the ninth is rejected.
    ///
    /// Default: 1,000,000
    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.config.max_actions = max_actions;
        self
    }

    /// Set the inclusive bounds on normalized action name length, in bytes.
    ///
    /// Default: 1..=20
    pub fn with_action_length(mut self, min: usize, max: usize) -> Self {
        self.config.min_action_length = min;
        self.config.max_action_length = max;
        self
    }

    /// Set the inclusive bounds on accepted times.
    ///
    /// Default: 0..=86,400,000 (one day in milliseconds)
    pub fn with_time_range(mut self, min: i64, max: i64) -> Self {
        self.config.min_time = min;
        self.config.max_time = max;
        self
    }

    /// Set the characters trimmed from both ends of action names.
    pub fn with_trim_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.config.trim_chars = chars.into_iter().collect::<BTreeSet<_>>();
        self
    }

    /// Lowercase action names after trimming.
    ///
    /// Default: enabled
    pub fn with_lowercase_actions(mut self, enabled: bool) -> Self {
        self.config.lowercase_actions = enabled;
        self
    }

    /// Use a different storage backend.
    pub fn with_storage<T>(self, storage: T) -> ActionStatsBuilder<T>
    where
        T: Storage<String, TallyEntry>,
    {
        ActionStatsBuilder {
            name: self.name,
            config: self.config,
            storage,
        }
    }

    /// Build the tally.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configured bounds are inconsistent.
    pub fn build(self) -> Result<ActionStats<S>, ConfigError> {
        self.config.validate()?;
        Ok(ActionStats::with_storage(self.name, self.config, self.storage))
    }
}
