//! Binary heap with position tracking used as the A* open set.
//!
//! Unlike [`std::collections::BinaryHeap`], [`IndexedHeap`] knows where every
//! item lives, so membership checks are O(1) and an item whose priority changed
//! can be moved to its new place in O(log n) instead of being pushed twice.
use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// An item that can be stored in an [`IndexedHeap`].
pub trait HeapItem {
    /// Identity of the item. Only one item per key can be in the heap at a time.
    type Key: Copy + Eq + Hash;

    fn key(&self) -> Self::Key;

    /// Three-way comparison where [`Ordering::Less`] means `self` should be
    /// removed before `other`.
    fn priority_cmp(&self, other: &Self) -> Ordering;
}

/// Min-heap ordered by [`HeapItem::priority_cmp`].
///
/// Slots are kept in a side map keyed by [`HeapItem::Key`] rather than on the
/// items themselves, so the items can be plain values.
#[derive(Debug, Clone)]
pub struct IndexedHeap<T: HeapItem> {
    items: Vec<T>,
    slots: FxHashMap<T::Key, usize>,
}

impl<T: HeapItem> Default for IndexedHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HeapItem> IndexedHeap<T> {
    pub fn new() -> Self {
        IndexedHeap {
            items: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = FxHashMap::default();
        slots.reserve(capacity);

        IndexedHeap {
            items: Vec::with_capacity(capacity),
            slots,
        }
    }

    /// Number of items in the heap.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if an item with the given key is in the heap.
    pub fn contains(&self, key: &T::Key) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns the item with the given key if it is in the heap.
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.slots.get(key).map(|&slot| &self.items[slot])
    }

    /// Returns the best item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Adds an item and sifts it up to its place.
    ///
    /// If an item with the same key is already queued it is replaced,
    /// the same as calling [`IndexedHeap::update_item`].
    pub fn add(&mut self, item: T) {
        if self.contains(&item.key()) {
            self.update_item(item);
            return;
        }

        let slot = self.items.len();
        self.slots.insert(item.key(), slot);
        self.items.push(item);
        self.sift_up(slot);
    }

    /// Removes and returns the best item, or `None` if the heap is empty.
    pub fn remove_best(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let last = self.items.len() - 1;
        self.swap(0, last);
        let best = self.items.pop()?;
        self.slots.remove(&best.key());

        if !self.items.is_empty() {
            self.sift_down(0);
        }

        Some(best)
    }

    /// Replaces the queued item that has the same key as `item` and restores
    /// heap order around it. Returns false if no such item is queued.
    pub fn update_item(&mut self, item: T) -> bool {
        let Some(&slot) = self.slots.get(&item.key()) else {
            return false;
        };

        self.items[slot] = item;
        let slot = self.sift_up(slot);
        self.sift_down(slot);
        true
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.slots.clear();
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.items[slot].priority_cmp(&self.items[parent]) != Ordering::Less {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.items.len();
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;

            if left >= len {
                break;
            }

            let mut best_child = left;
            if right < len
                && self.items[right].priority_cmp(&self.items[left]) == Ordering::Less
            {
                best_child = right;
            }

            if self.items[best_child].priority_cmp(&self.items[slot]) != Ordering::Less {
                break;
            }

            self.swap(slot, best_child);
            slot = best_child;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.items.swap(a, b);
        self.slots.insert(self.items[a].key(), a);
        self.slots.insert(self.items[b].key(), b);
    }
}
