// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded memo of search results with oldest-first eviction.
//!
//! Plain FIFO: a hit does not refresh an entry's age. Re-setting an existing
//! key replaces the value in place and keeps its queue position.

use crate::contracts::check_cache_bounded;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SearchCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> SearchCache<K, V> {
    /// A cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SearchCache {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                debug!(capacity = self.capacity, "search cache evicted oldest entry");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        check_cache_bounded(self.entries.len(), self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
