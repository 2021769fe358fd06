//! Cancellable debounced tasks, one pending task per key.
//!
//! # Invariants
//! - At most one deadline is pending per key.
//! - Rescheduling replaces the previous deadline (cancel + reschedule).
//! - A task fires only once its deadline has passed.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct DebounceQueue<K> {
    window_ms: i64,
    deadlines: HashMap<K, i64>,
}

impl<K: Copy + Eq + Hash + Ord> DebounceQueue<K> {
    pub fn new(window_ms: i64) -> Self {
        Self {
            window_ms: window_ms.max(0),
            deadlines: HashMap::new(),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// (Re)schedules the task for `key` and returns its new deadline.
    pub fn schedule(&mut self, key: K, now_ms: i64) -> i64 {
        let deadline = now_ms + self.window_ms;
        self.deadlines.insert(key, deadline);
        deadline
    }

    /// Cancels the pending task for `key`; returns whether one existed.
    pub fn cancel(&mut self, key: K) -> bool {
        self.deadlines.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.deadlines.contains_key(&key)
    }

    pub fn pending_count(&self) -> usize {
        self.deadlines.len()
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.deadlines.values().copied().min()
    }

    /// Removes and returns every key whose deadline is at or before `now_ms`,
    /// earliest first.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<K> {
        let mut due: Vec<(i64, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort();
        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Removes and returns every pending key regardless of deadline.
    pub fn take_all(&mut self) -> Vec<K> {
        let mut keys: Vec<(i64, K)> = self
            .deadlines
            .drain()
            .map(|(key, deadline)| (deadline, key))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }
}
