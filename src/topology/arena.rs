// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Slot storage with deferred reclamation
//!
//! Deleting an entity only unlinks it from the live list and parks its key
//! on the invalidation list. The record stays readable until
//! [`Arena::clear_invalid`] drops it, after which the generation check in
//! the slot map turns any further lookup into a miss.

use slotmap::{Key, SlotMap};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    /// Position in the live list, `None` once invalidated
    position: Option<usize>,
}

/// Storage for one entity kind
#[derive(Debug, Clone)]
pub(crate) struct Arena<K: Key, T> {
    slots: SlotMap<K, Slot<T>>,
    live: Vec<K>,
    invalid: Vec<K>,
}

impl<K: Key, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            live: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            live: Vec::with_capacity(capacity),
            invalid: Vec::new(),
        }
    }

    /// Append to the live list
    pub fn insert(&mut self, value: T) -> K {
        let position = Some(self.live.len());
        let key = self.slots.insert(Slot { value, position });
        self.live.push(key);
        key
    }

    /// Move a live entity onto the invalidation list
    ///
    /// Returns false if the key is stale or already invalidated.
    pub fn invalidate(&mut self, key: K) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        let Some(position) = slot.position.take() else {
            return false;
        };

        self.live.swap_remove(position);
        if let Some(&moved) = self.live.get(position) {
            self.slots[moved].position = Some(position);
        }
        self.invalid.push(key);
        true
    }

    /// Live or still-pending record
    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key).map(|slot| &mut slot.value)
    }

    pub fn is_live(&self, key: K) -> bool {
        self.slots
            .get(key)
            .is_some_and(|slot| slot.position.is_some())
    }

    pub fn live(&self) -> &[K] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn invalid_len(&self) -> usize {
        self.invalid.len()
    }

    /// Drop every invalidated record, returning how many were freed
    pub fn clear_invalid(&mut self) -> usize {
        let count = self.invalid.len();
        for key in self.invalid.drain(..) {
            self.slots.remove(key);
        }
        count
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.live.clear();
        self.invalid.clear();
    }

    /// Remove every live record in live-list order, leaving the arena empty
    pub fn drain_live(&mut self) -> Vec<(K, T)> {
        let live = std::mem::take(&mut self.live);
        let drained = live
            .into_iter()
            .filter_map(|key| self.slots.remove(key).map(|slot| (key, slot.value)))
            .collect();
        self.clear();
        drained
    }
}

impl<K: Key, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T> Index<K> for Arena<K, T> {
    type Output = T;

    fn index(&self, key: K) -> &T {
        &self.slots[key].value
    }
}

impl<K: Key, T> IndexMut<K> for Arena<K, T> {
    fn index_mut(&mut self, key: K) -> &mut T {
        &mut self.slots[key].value
    }
}
