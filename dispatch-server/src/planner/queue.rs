//! Indexed binary min-heap.
//!
//! The frontier for A*: insert, insert-or-decrease and extract-min in
//! O(log n), membership in O(1). A side table maps each queued key to its
//! current slot in the heap array so a key can be found and re-prioritised
//! without a scan.

use std::collections::HashMap;
use std::hash::Hash;

/// A queued key and its priority.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapEntry<K> {
    pub key: K,
    pub priority: f64,
}

/// Min-heap keyed by `K` with decrease-key support.
///
/// Each key appears at most once. Priorities must not be NaN. Equal
/// priorities are not tie-broken by any secondary key: order falls out of
/// the sift operations, which only move an entry past a strictly larger one.
/// That order is deterministic, but it is plain insertion order only while
/// the heap holds at most two entries.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap<K> {
    heap: Vec<HeapEntry<K>>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Default for IndexedMinHeap<K> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> IndexedMinHeap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Current priority of a queued key.
    pub fn priority_of(&self, key: &K) -> Option<f64> {
        self.positions.get(key).map(|&at| self.heap[at].priority)
    }

    /// The minimum entry, without removing it.
    pub fn peek(&self) -> Option<&HeapEntry<K>> {
        self.heap.first()
    }

    /// Insert `key`, or lower its priority if already queued.
    ///
    /// A queued key is only updated when `priority` is strictly smaller than
    /// the stored one; raising a priority is never honoured. Returns whether
    /// the queue changed.
    pub fn push(&mut self, key: K, priority: f64) -> bool {
        if let Some(&at) = self.positions.get(&key) {
            if priority < self.heap[at].priority {
                self.heap[at].priority = priority;
                self.sift_up(at);
                return true;
            }
            return false;
        }

        let at = self.heap.len();
        self.positions.insert(key.clone(), at);
        self.heap.push(HeapEntry { key, priority });
        self.sift_up(at);
        true
    }

    /// Remove and return the minimum-priority entry.
    pub fn pop(&mut self) -> Option<HeapEntry<K>> {
        if self.heap.is_empty() {
            return None;
        }

        // swap_remove moves the last entry into the root slot.
        let top = self.heap.swap_remove(0);
        self.positions.remove(&top.key);
        if let Some(root) = self.heap.first()
            && let Some(at) = self.positions.get_mut(&root.key)
        {
            *at = 0;
            self.sift_down(0);
        }
        Some(top)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        if let Some(at) = self.positions.get_mut(&self.heap[i].key) {
            *at = i;
        }
        if let Some(at) = self.positions.get_mut(&self.heap[j].key) {
            *at = j;
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[parent].priority <= self.heap[idx].priority {
                break;
            }
            self.swap(parent, idx);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let n = self.heap.len();
        loop {
            let left = idx * 2 + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < n && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < n && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    /// Heap order holds and every key's recorded slot is its real slot.
    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let ordered = (1..self.heap.len())
            .all(|i| self.heap[(i - 1) / 2].priority <= self.heap[i].priority);
        let indexed = self.positions.len() == self.heap.len()
            && self
                .heap
                .iter()
                .enumerate()
                .all(|(i, e)| self.positions.get(&e.key) == Some(&i));
        ordered && indexed
    }
}
