//! # action-tally
//!
//! Concurrent, in-memory tally of "action occurred, taking T" events.
//!
//! An [`ActionStats`] keeps a running total and count per distinct action and
//! reports the average time per action on demand. Its raw state can be
//! exported and reloaded so it can be persisted elsewhere.
//!
//! ## Quick Start
//!
//! ```rust
//! use action_tally::ActionStats;
//!
//! let stats = ActionStats::new("game");
//! stats.add_action("jump", 100).unwrap();
//! stats.add_action("run", 75).unwrap();
//! stats.add_action("jump", 200).unwrap();
//!
//! for entry in stats.stats() {
//!     println!("{}: {}", entry.action, entry.avg);
//! }
//! // jump: 150
//! // run: 75
//! ```
//!
//! ## Normalization and Validation
//!
//! Before an action touches shared state it is normalized and checked:
//!
//! 1. Leading and trailing characters from the trim set are removed
//!    (default: space and `` {}<>"'` ``).
//! 2. The name is lowercased (default: on).
//! 3. The normalized name must be 1 to 20 bytes long (inclusive).
//! 4. The time must be within 0 to 86,400,000 (inclusive, one day in ms).
//!
//! So `" Jump "` and `"jump"` tally into the same entry. Rejected actions
//! never take the store lock.
//!
//! ```rust
//! use action_tally::{ActionStats, ErrorKind};
//!
//! let stats = ActionStats::new("game");
//! let err = stats.add_action("jump", -100).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidTime);
//! assert_eq!(err.to_string(), "ActionStats: Action jump Time -100 is invalid");
//! ```
//!
//! ## Bounded Cardinality and Overflow
//!
//! At most `max_actions` distinct actions are tracked (default 1,000,000).
//! The limit is inclusive: a new action is refused with
//! [`TallyError::CapacityExceeded`] only once the store already holds
//! `max_actions` entries. Running totals are summed with an explicit
//! overflow check; an action whose total would exceed `i64::MAX` is refused
//! with [`TallyError::Overflow`] and its entry is left as it was.
//!
//! ```rust
//! use action_tally::ActionStats;
//!
//! let stats = ActionStats::builder()
//!     .with_max_actions(2)
//!     .with_time_range(0, 1_000)
//!     .build()
//!     .expect("valid config");
//!
//! stats.add_action("a", 1).unwrap();
//! stats.add_action("b", 1).unwrap();
//! assert!(stats.add_action("c", 1).is_err());
//! ```
//!
//! ## Snapshots
//!
//! ```rust
//! use action_tally::ActionStats;
//!
//! let stats = ActionStats::new("primary");
//! stats.add_action("jump", 100).unwrap();
//! stats.add_action("jump", 200).unwrap();
//!
//! let snapshot = stats.take_snapshot();
//! let replica = ActionStats::new("replica");
//! replica.load_snapshot(snapshot).unwrap();
//! assert_eq!(stats.stats(), replica.stats());
//! ```
//!
//! Loading a snapshot replaces the whole tally atomically. If an action
//! appears more than once in a snapshot, the last occurrence wins. The
//! [`infrastructure::json`] adapter converts actions, stats and snapshots
//! to and from JSON text.
//!
//! ## Concurrency
//!
//! Every operation takes `&self`; share an `ActionStats` with `Arc`. The
//! default [`LockedStorage`] guards the whole map with one mutex, so every
//! operation is linearizable. [`ShardedStorage`] spreads updates over
//! DashMap shards and still gives stats, snapshots, loads and clears a
//! consistent view by taking an exclusive gate:
//!
//! ```rust
//! use action_tally::{ActionStats, ShardedStorage};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let stats = Arc::new(
//!     ActionStats::builder()
//!         .with_storage(ShardedStorage::new())
//!         .build()
//!         .unwrap(),
//! );
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let stats = Arc::clone(&stats);
//!         thread::spawn(move || {
//!             for _ in 0..100 {
//!                 stats.add_action("jump", 1).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(stats.take_snapshot()[0].count, 400);
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    action::{Action, NormalizedAction},
    config::{ConfigError, TallyConfig},
    error::{ErrorKind, TallyError},
    report::{ActionAverage, SnapshotEntry},
    tally::{checked_accumulate, TallyEntry},
};

pub use application::{
    aggregator::{ActionStats, ActionStatsBuilder, DefaultStorage},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Storage, Upsert},
};

pub use infrastructure::storage::{LockedStorage, ShardedStorage};
