//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::hash::Hash;

/// Result of a single [`Storage::upsert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The key was absent and the initial value was stored
    Inserted,
    /// The key was present and its value was replaced
    Updated,
    /// The key was absent and the store is full; nothing was stored
    AtCapacity,
    /// The key was present but the update function declined; value unchanged
    Rejected,
}

/// Port for concurrent keyed accumulator storage.
///
/// Every method is atomic with respect to every other method on the same
/// store: an observer sees either all or none of an `upsert`, `replace` or
/// `clear`, and `snapshot` never returns a partially applied state.
/// Infrastructure provides concrete implementations (`LockedStorage`,
/// `ShardedStorage`).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Insert or update the value for `key`.
    ///
    /// # Arguments
    /// * `key` - The key to insert or update
    /// * `max_entries` - Absent keys are only inserted while the store holds
    ///   fewer than this many entries
    /// * `initial` - Value stored if the key is absent
    /// * `update` - Computes the replacement for a present value; returning
    ///   `None` leaves the value untouched
    fn upsert<F>(&self, key: K, max_entries: usize, initial: V, update: F) -> Upsert
    where
        F: FnOnce(&V) -> Option<V>;

    /// Copy every entry out of the store.
    ///
    /// Order is unspecified.
    fn snapshot(&self) -> Vec<(K, V)>;

    /// Replace the whole contents of the store.
    ///
    /// When a key occurs more than once the last occurrence wins.
    fn replace(&self, entries: Vec<(K, V)>);

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries from the storage.
    fn clear(&self);
}
