//! Time-bounded pending-choice store for the interactive front end.
//!
//! The store is an ordinary value owned by the caller; the conversion crates never see it.
//! Time is passed in explicitly so expiry is deterministic under test.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct PendingChoices<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V> PendingChoices<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Remember `value` for `key`, replacing any earlier pending choice.
    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        let expires_at = now + self.ttl;
        self.entries.insert(key, Entry { value, expires_at });
    }

    /// Remove and return the pending value if it has not expired.
    pub fn take(&mut self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.remove(key)?;
        (now < entry.expires_at).then_some(entry.value)
    }

    pub fn peek(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|e| now < e.expires_at)
            .map(|e| &e.value)
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| now < e.expires_at);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
