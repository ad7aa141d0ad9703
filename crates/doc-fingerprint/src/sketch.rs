//! Fixed-size sketches: the `k` smallest hashes of a document.

use std::collections::HashSet;

use crate::error::Result;
use crate::sink::HashSink;
use crate::types::Signature;

/// Outcome of [`BoundedMaxHeap::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapInsert {
    Added,
    /// The heap was full; the returned former maximum was evicted.
    Replaced(i32),
    Rejected,
}

/// Array-backed max-heap that never holds more than `capacity` values.
///
/// The root is the largest retained value, so deciding whether a new value
/// belongs among the `capacity` smallest is a single comparison.
#[derive(Clone, Debug)]
pub struct BoundedMaxHeap {
    values: Vec<i32>,
    capacity: usize,
}

impl BoundedMaxHeap {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// Current maximum.
    pub fn peek(&self) -> Option<i32> {
        self.values.first().copied()
    }

    pub fn insert(&mut self, value: i32) -> HeapInsert {
        if self.values.len() < self.capacity {
            self.values.push(value);
            self.sift_up(self.values.len() - 1);
            return HeapInsert::Added;
        }
        match self.values.first().copied() {
            Some(max) if value <= max => {
                self.values[0] = value;
                self.sift_down(0);
                HeapInsert::Replaced(max)
            }
            _ => HeapInsert::Rejected,
        }
    }

    /// Remove and return the current maximum.
    pub fn pop(&mut self) -> Option<i32> {
        let last = self.values.pop()?;
        if self.values.is_empty() {
            return Some(last);
        }
        let max = std::mem::replace(&mut self.values[0], last);
        self.sift_down(0);
        Some(max)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Drain into an ascending vector by popping maxima into the back.
    pub fn drain_sorted(&mut self) -> Vec<i32> {
        let mut sorted = vec![0i32; self.values.len()];
        for slot in sorted.iter_mut().rev() {
            if let Some(max) = self.pop() {
                *slot = max;
            }
        }
        sorted
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.values[i] <= self.values[parent] {
                break;
            }
            self.values.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.values.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;
            if left < n && self.values[left] > self.values[largest] {
                largest = left;
            }
            if right < n && self.values[right] > self.values[largest] {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.values.swap(i, largest);
            i = largest;
        }
    }
}

/// Keeps the `k` smallest hashes seen, independent of document length.
///
/// By default every accepted hash is inserted, so a repeated shingle can
/// occupy several slots. With `distinct` set, values already retained are
/// ignored and the sketch holds `k` different hashes.
#[derive(Clone, Debug)]
pub struct BoundedTopKSketch {
    heap: BoundedMaxHeap,
    members: Option<HashSet<i32>>,
}

impl BoundedTopKSketch {
    pub fn new(k: usize) -> Self {
        Self {
            heap: BoundedMaxHeap::new(k),
            members: None,
        }
    }

    pub fn distinct(k: usize) -> Self {
        Self {
            heap: BoundedMaxHeap::new(k),
            members: Some(HashSet::with_capacity(k)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn insert(&mut self, value: i32) {
        match self.members.as_mut() {
            None => {
                self.heap.insert(value);
            }
            Some(members) => {
                if members.contains(&value) {
                    return;
                }
                match self.heap.insert(value) {
                    HeapInsert::Added => {
                        members.insert(value);
                    }
                    HeapInsert::Replaced(evicted) => {
                        members.remove(&evicted);
                        members.insert(value);
                    }
                    HeapInsert::Rejected => {}
                }
            }
        }
    }

    /// Ascending signature of the retained values. Leaves the sketch empty.
    pub fn take_signature(&mut self) -> Signature {
        if let Some(members) = self.members.as_mut() {
            members.clear();
        }
        Signature::from_unsorted(self.heap.drain_sorted())
    }
}

impl HashSink for BoundedTopKSketch {
    fn accept(&mut self, hash: i32, _position: usize) -> Result<()> {
        self.insert(hash);
        Ok(())
    }

    fn reset(&mut self) {
        self.heap.clear();
        if let Some(members) = self.members.as_mut() {
            members.clear();
        }
    }
}
