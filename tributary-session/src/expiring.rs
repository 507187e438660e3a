//! ExpiringMap: concurrent map with idle-time expiry.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};

struct Slot<V> {
    value: V,
    last_touched: DateTime<Utc>,
}

/// Entries idle for longer than `ttl` are dropped on the next access.
///
/// Reads and writes both refresh an entry's `last_touched`. Mutation runs
/// under the entry's shard lock, so concurrent updates to one key are
/// serialized and never interleave.
pub struct ExpiringMap<K, V> {
    entries: DashMap<K, Slot<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> ExpiringMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut removed = 0;
        self.entries.retain(|_, slot| {
            let live = now - slot.last_touched <= ttl;
            if !live {
                removed += 1;
            }
            live
        });
        if removed > 0 {
            tracing::debug!(removed, "expired entries swept");
        }
        removed
    }

    /// Apply `f` to the value under `key`, inserting `V::default()` first if
    /// the key is absent or expired.
    pub fn update<F, R>(&self, key: K, f: F) -> R
    where
        V: Default,
        F: FnOnce(&mut V) -> R,
    {
        self.purge_expired();
        let now = self.clock.now();
        let mut slot = self.entries.entry(key).or_insert_with(|| Slot {
            value: V::default(),
            last_touched: now,
        });
        slot.last_touched = now;
        f(&mut slot.value)
    }

    /// A copy of the live value under `key`. Does not create an entry.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.purge_expired();
        let now = self.clock.now();
        self.entries.get_mut(key).map(|mut slot| {
            slot.last_touched = now;
            slot.value.clone()
        })
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key).map(|(_, slot)| slot.value)
    }

    /// Live entries, after a sweep.
    pub fn len(&self) -> usize {
        self.purge_expired();
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
