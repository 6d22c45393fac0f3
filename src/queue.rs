//! Comparator-ordered ready queue.
//!
//! The queue keeps every in-flight job, waiting and running alike, sorted by
//! the active policy's comparator. It is deliberately a flat growable array
//! rather than a binary heap: the scheduler needs the *rank* an insertion
//! lands at (a rank inside the first `cores` positions means the job is
//! entitled to a core right now) and reads and removes by position. Linear
//! insertion is the accepted price; these queues are event-loop sized.
//!
//! # Ordering Contract
//!
//! `insert` places a new element before the first stored element strictly
//! greater than it, so equal elements keep insertion order (stable ties). An
//! all-equal comparator therefore degenerates to plain FIFO, which is
//! exactly what first-come-first-served and round-robin requeueing want.
//!
//! Stored elements may be mutated through `iter_mut`; the queue never
//! re-sorts on its own. Order reflects comparator keys as of each insertion,
//! and the scheduler re-synchronizes live keys before any rank-sensitive
//! insert.

use std::cmp::Ordering;
use std::slice;

/// An ordered sequence with positional access.
///
/// The element type is generic; the ordering function is fixed at
/// construction and consulted only on insertion.
#[derive(Debug, Clone)]
pub struct ReadyQueue<T> {
    items: Vec<T>,
    order: fn(&T, &T) -> Ordering,
}

impl<T> ReadyQueue<T> {
    /// Creates an empty queue ordered by `order`.
    pub fn new(order: fn(&T, &T) -> Ordering) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    /// Inserts `item` at its rank and returns that rank (0 = front).
    ///
    /// The new element lands after every stored element comparing less than
    /// *or equal to* it, keeping ties in insertion order.
    pub fn insert(&mut self, item: T) -> usize {
        let order = self.order;
        let rank = self
            .items
            .iter()
            .position(|stored| order(stored, &item) == Ordering::Greater)
            .unwrap_or(self.items.len());
        self.items.insert(rank, item);
        rank
    }

    /// Front element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Removes and returns the front element.
    pub fn take_front(&mut self) -> Option<T> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.remove(0))
        }
    }

    /// Element at `rank`; out of range is `None`, never a fault.
    pub fn at(&self, rank: usize) -> Option<&T> {
        self.items.get(rank)
    }

    /// Removes and returns the element at `rank`, or `None` out of range.
    pub fn remove_at(&mut self, rank: usize) -> Option<T> {
        if rank < self.items.len() {
            Some(self.items.remove(rank))
        } else {
            None
        }
    }

    /// Removes every element matching `matches` and returns how many went.
    ///
    /// Matching is the caller's notion of identity (the scheduler matches on
    /// job id); the comparator plays no part here.
    pub fn remove_matching(&mut self, matches: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !matches(item));
        before - self.items.len()
    }

    /// Rank of the first element matching `matches`.
    pub fn position(&self, matches: impl Fn(&T) -> bool) -> Option<usize> {
        self.items.iter().position(|item| matches(item))
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates elements in rank order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutably iterates elements in rank order. Does not re-sort.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}
