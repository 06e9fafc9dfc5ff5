//! Storage implementations for action tallies.
//!
//! Two adapters implement the [`Storage`] port:
//! - [`LockedStorage`]: one mutex over one map. Every operation serializes.
//! - [`ShardedStorage`]: a DashMap for per-shard locking on the update path,
//!   behind a gate that whole-store operations take exclusively.

use crate::application::ports::{Storage, Upsert};
use ahash::RandomState;
use dashmap::DashMap;
use std::collections::hash_map::{self, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Coarse-grained storage: a single mutex guards the entire map.
///
/// This is the default backend. Critical sections are one map operation for
/// updates and one pass over the map for snapshots.
pub struct LockedStorage<K, V> {
    map: Mutex<HashMap<K, V, RandomState>>,
}

impl<K, V> LockedStorage<K, V>
where
    K: Eq + Hash,
{
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::with_hasher(RandomState::new())),
        }
    }

    // A panic inside a critical section cannot leave a half-written entry:
    // every mutation is a single insert, replace or swap.
    fn lock(&self) -> MutexGuard<'_, HashMap<K, V, RandomState>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for LockedStorage<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for LockedStorage<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedStorage").finish_non_exhaustive()
    }
}

impl<K, V> Storage<K, V> for LockedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn upsert<F>(&self, key: K, max_entries: usize, initial: V, update: F) -> Upsert
    where
        F: FnOnce(&V) -> Option<V>,
    {
        let mut map = self.lock();
        let len = map.len();
        match map.entry(key) {
            hash_map::Entry::Occupied(mut slot) => match update(slot.get()) {
                Some(value) => {
                    slot.insert(value);
                    Upsert::Updated
                }
                None => Upsert::Rejected,
            },
            hash_map::Entry::Vacant(slot) => {
                if len >= max_entries {
                    Upsert::AtCapacity
                } else {
                    slot.insert(initial);
                    Upsert::Inserted
                }
            }
        }
    }

    fn snapshot(&self) -> Vec<(K, V)> {
        let map = self.lock();
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn replace(&self, entries: Vec<(K, V)>) {
        // Built before taking the lock; only the swap happens inside it.
        let mut fresh = HashMap::with_capacity_and_hasher(entries.len(), RandomState::new());
        fresh.extend(entries);
        let old = std::mem::replace(&mut *self.lock(), fresh);
        drop(old);
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn clear(&self) {
        let old = std::mem::take(&mut *self.lock());
        drop(old);
    }
}

/// Sharded storage backed by DashMap.
///
/// Updates to different keys only contend on their shard. Whole-store
/// operations (`snapshot`, `replace`, `clear`) take the gate exclusively, so
/// they wait for in-flight updates and observe or replace a consistent state
/// across every shard.
///
/// The distinct-key limit is enforced exactly: a slot is reserved in an
/// atomic counter while the shard holding the vacant key is locked.
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash,
{
    gate: RwLock<()>,
    map: DashMap<K, V, RandomState>,
    entries: AtomicUsize,
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            gate: RwLock::new(()),
            map: DashMap::with_hasher(RandomState::new()),
            entries: AtomicUsize::new(0),
        }
    }

    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn reserve_slot(&self, max_entries: usize) -> bool {
        self.entries
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max_entries).then_some(n + 1)
            })
            .is_ok()
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ShardedStorage<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedStorage")
            .field("entries", &self.entries.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<K, V> Storage<K, V> for ShardedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn upsert<F>(&self, key: K, max_entries: usize, initial: V, update: F) -> Upsert
    where
        F: FnOnce(&V) -> Option<V>,
    {
        let _gate = self.shared();
        match self.map.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(mut slot) => match update(slot.get()) {
                Some(value) => {
                    slot.insert(value);
                    Upsert::Updated
                }
                None => Upsert::Rejected,
            },
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                if self.reserve_slot(max_entries) {
                    slot.insert(initial);
                    Upsert::Inserted
                } else {
                    Upsert::AtCapacity
                }
            }
        }
    }

    fn snapshot(&self) -> Vec<(K, V)> {
        let _gate = self.exclusive();
        self.map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn replace(&self, entries: Vec<(K, V)>) {
        let _gate = self.exclusive();
        self.map.clear();
        for (key, value) in entries {
            self.map.insert(key, value);
        }
        self.entries.store(self.map.len(), Ordering::Release);
    }

    fn len(&self) -> usize {
        let _gate = self.shared();
        self.map.len()
    }

    fn clear(&self) {
        let _gate = self.exclusive();
        self.map.clear();
        self.entries.store(0, Ordering::Release);
    }
}

// Implement Storage for Arc<S> so one store can back several handles
impl<K, V, S> Storage<K, V> for Arc<S>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Clone + Send + Sync,
    S: Storage<K, V>,
{
    fn upsert<F>(&self, key: K, max_entries: usize, initial: V, update: F) -> Upsert
    where
        F: FnOnce(&V) -> Option<V>,
    {
        (**self).upsert(key, max_entries, initial, update)
    }

    fn snapshot(&self) -> Vec<(K, V)> {
        (**self).snapshot()
    }

    fn replace(&self, entries: Vec<(K, V)>) {
        (**self).replace(entries)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&self) {
        (**self).clear()
    }
}
