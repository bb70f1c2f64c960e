//! Fixed-capacity tick history.
//!
//! Ticks are stored in a preallocated arena and addressed through a head
//! index, so appends are O(1) and never shift existing entries. Once the
//! buffer is full each append overwrites the oldest tick.

use tick_oracle_core::Tick;

/// Default number of ticks retained per symbol.
pub const DEFAULT_CAPACITY: usize = 500;

/// Bounded, arrival-ordered history of recent ticks for one feed.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    slots: Vec<Tick>,
    /// Index of the oldest tick once the arena is full
    head: usize,
    capacity: usize,
}

impl Default for TickBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TickBuffer {
    /// Creates an empty buffer holding at most `capacity` ticks (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Appends a tick, evicting the oldest one when full.
    pub fn append(&mut self, tick: Tick) {
        if self.slots.len() < self.capacity {
            self.slots.push(tick);
        } else {
            self.slots[self.head] = tick;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended tick.
    #[must_use]
    pub fn latest(&self) -> Option<&Tick> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.slots.len() - 1) % self.slots.len();
        self.slots.get(idx)
    }

    /// Iterates all ticks from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Tick> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Returns the last `min(n, len)` ticks in arrival order.
    #[must_use]
    pub fn window(&self, n: usize) -> Vec<Tick> {
        let skip = self.len().saturating_sub(n);
        self.iter().skip(skip).copied().collect()
    }

    /// Removes all ticks, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}
