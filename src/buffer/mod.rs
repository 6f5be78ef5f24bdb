//! Instrumented buffer
//!
//! [`InstrumentedBuffer`] wraps a fixed-length sequence of slots and is the
//! only way the sorters touch data. Every operation:
//!
//! 1. validates its indices (rejecting with [`BufferError`] before any side
//!    effect),
//! 2. bumps the [`Counters`],
//! 3. fires the registered observers,
//! 4. performs the mutation.
//!
//! # Operation costs
//!
//! | operation       | accesses | reads | writes | compares | swaps |
//! |-----------------|----------|-------|--------|----------|-------|
//! | `get`           | 1        | 1     |        |          |       |
//! | `set`           | 1        |       | 1      |          |       |
//! | `remove`        | 1        | 1     |        |          |       |
//! | `move_item`     | 1        | 1     | 1      |          |       |
//! | `compare`       | 2        | 2     |        | 1        |       |
//! | `compare_value` | 1        | 1     |        | 1        |       |
//! | `swap`          | 4        | 2     | 2      |          | 1     |
//!
//! # Empty slots
//!
//! Slots are `Option<T>`. A buffer created with [`InstrumentedBuffer::with_len`]
//! starts all-empty; [`remove`](InstrumentedBuffer::remove) and
//! [`move_item`](InstrumentedBuffer::move_item) leave a slot empty. Reading or
//! comparing an empty slot is an error.

pub mod counters;
pub mod observer;

use crate::errors::{BufferError, BufferResult};
use std::cmp::Ordering;
use std::fmt;

pub use counters::Counters;
pub use observer::{channel_observers, BufferEvent};
use observer::Observers;

/// A fixed-length sequence whose every access is counted and observable
pub struct InstrumentedBuffer<T> {
    slots: Vec<Option<T>>,
    counts: Counters,
    observers: Observers<T>,
}

impl<T> InstrumentedBuffer<T> {
    /// Create a buffer of `len` empty slots
    pub fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        InstrumentedBuffer {
            slots,
            counts: Counters::default(),
            observers: Observers::new(),
        }
    }

    /// Fail with `SizeMismatch` unless this buffer holds exactly `expected`
    /// slots
    pub fn ensure_len(&self, expected: usize) -> BufferResult<()> {
        if self.slots.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: self.slots.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn check(&self, index: usize) -> BufferResult<()> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(BufferError::OutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    fn occupied(&self, index: usize) -> BufferResult<&T> {
        self.check(index)?;
        self.slots[index]
            .as_ref()
            .ok_or(BufferError::EmptySlot { index })
    }

    /// Write `item` into slot `index`, replacing whatever was there
    pub fn set(&mut self, index: usize, item: T) -> BufferResult<()> {
        self.check(index)?;
        self.counts.write(1);

        self.observers.access(index, self.slots[index].as_ref());
        self.observers
            .change(index, self.slots[index].as_ref(), Some(&item));

        self.slots[index] = Some(item);
        Ok(())
    }

    /// Lift the element out of slot `index`, leaving the slot empty.
    ///
    /// Counted as a read only; the slot becoming empty is not a write.
    pub fn remove(&mut self, index: usize) -> BufferResult<T> {
        self.occupied(index)?;
        self.counts.read(1);

        self.observers.access(index, self.slots[index].as_ref());
        self.observers.change(index, self.slots[index].as_ref(), None);

        self.slots[index]
            .take()
            .ok_or(BufferError::EmptySlot { index })
    }

    /// Relocate the element at `from` into `to`, leaving `from` empty
    pub fn move_item(&mut self, from: usize, to: usize) -> BufferResult<()> {
        self.occupied(from)?;
        self.check(to)?;
        self.counts.accesses += 1;
        self.counts.reads += 1;
        self.counts.writes += 1;

        let moving = self.slots[from].as_ref();
        self.observers.access(from, moving);
        self.observers.access(to, moving);
        self.observers.change(from, moving, None);
        self.observers.change(to, self.slots[to].as_ref(), moving);

        let item = self.slots[from].take();
        self.slots[to] = item;
        Ok(())
    }

    /// Exchange the contents of two slots
    pub fn swap(&mut self, a: usize, b: usize) -> BufferResult<()> {
        self.check(a)?;
        self.check(b)?;
        self.counts.read(2);
        self.counts.write(2);
        self.counts.swaps += 1;

        self.observers.access(a, self.slots[a].as_ref());
        self.observers.access(b, self.slots[b].as_ref());
        self.observers
            .change(a, self.slots[a].as_ref(), self.slots[b].as_ref());
        self.observers
            .change(b, self.slots[b].as_ref(), self.slots[a].as_ref());

        self.slots.swap(a, b);
        Ok(())
    }

    /// Zero all five counters. No observer fires.
    pub fn reset_counts(&mut self) {
        self.counts = Counters::default();
    }

    pub fn counts(&self) -> Counters {
        self.counts
    }

    pub fn accesses(&self) -> u64 {
        self.counts.accesses
    }

    pub fn reads(&self) -> u64 {
        self.counts.reads
    }

    pub fn writes(&self) -> u64 {
        self.counts.writes
    }

    pub fn compares(&self) -> u64 {
        self.counts.compares
    }

    pub fn swaps(&self) -> u64 {
        self.counts.swaps
    }

    /// Register the access observer, replacing any previous one
    pub fn on_access<F>(&mut self, f: F)
    where
        F: FnMut(usize, Option<&T>) + Send + 'static,
    {
        self.observers.set_access(Box::new(f));
    }

    /// Register the change observer, replacing any previous one
    pub fn on_change<F>(&mut self, f: F)
    where
        F: FnMut(usize, Option<&T>, Option<&T>) + Send + 'static,
    {
        self.observers.set_change(Box::new(f));
    }

    /// Register the compare observer, replacing any previous one
    pub fn on_compare<F>(&mut self, f: F)
    where
        F: FnMut(usize, Option<usize>, Option<&T>, Option<&T>) + Send + 'static,
    {
        self.observers.set_compare(Box::new(f));
    }

    /// Drop all three observers
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Uninstrumented view of the slots, for display and assertions
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }
}

impl<T: Clone> InstrumentedBuffer<T> {
    /// Create a buffer holding a copy of `items`
    pub fn from_slice(items: &[T]) -> Self {
        Self::from(items.to_vec())
    }

    /// Read the element at `index`
    pub fn get(&mut self, index: usize) -> BufferResult<T> {
        let item = self.occupied(index)?.clone();
        self.counts.read(1);
        self.observers.access(index, Some(&item));
        Ok(item)
    }

    /// Uninstrumented copy of the occupied slots, in order
    pub fn values(&self) -> Vec<T> {
        self.slots.iter().flatten().cloned().collect()
    }
}

impl<T: Ord> InstrumentedBuffer<T> {
    /// Three-way comparison of the elements at `a` and `b`
    pub fn compare(&mut self, a: usize, b: usize) -> BufferResult<Ordering> {
        self.occupied(a)?;
        self.occupied(b)?;
        self.counts.read(2);
        self.counts.compares += 1;

        self.observers.access(a, self.slots[a].as_ref());
        self.observers.access(b, self.slots[b].as_ref());
        self.observers
            .compare(a, Some(b), self.slots[a].as_ref(), self.slots[b].as_ref());

        Ok(self.slots[a].cmp(&self.slots[b]))
    }

    /// Three-way comparison of the element at `index` with a value held
    /// outside the buffer
    pub fn compare_value(&mut self, index: usize, value: &T) -> BufferResult<Ordering> {
        let ordering = self.occupied(index)?.cmp(value);
        self.counts.read(1);
        self.counts.compares += 1;

        self.observers.access(index, self.slots[index].as_ref());
        self.observers
            .compare(index, None, self.slots[index].as_ref(), Some(value));

        Ok(ordering)
    }

    /// Uninstrumented check that every slot is occupied and in
    /// non-decreasing order
    pub fn is_sorted(&self) -> bool {
        self.slots.iter().all(Option::is_some) && self.slots.windows(2).all(|w| w[0] <= w[1])
    }
}

impl<T> From<Vec<T>> for InstrumentedBuffer<T> {
    fn from(items: Vec<T>) -> Self {
        InstrumentedBuffer {
            slots: items.into_iter().map(Some).collect(),
            counts: Counters::default(),
            observers: Observers::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for InstrumentedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedBuffer")
            .field("slots", &self.slots)
            .field("counts", &self.counts)
            .field("observed", &self.observers.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_swap_costs() {
        let mut buf = InstrumentedBuffer::from(vec![3, 1]);
        buf.swap(0, 1).unwrap();
        assert_eq!(buf.values(), vec![1, 3]);
        assert_eq!(
            buf.counts(),
            Counters {
                accesses: 4,
                reads: 2,
                writes: 2,
                compares: 0,
                swaps: 1,
            }
        );
    }

    #[test]
    fn test_out_of_range_has_no_side_effects() {
        let (tx, rx) = mpsc::channel();
        let mut buf = InstrumentedBuffer::from(vec![1, 2, 3]);
        channel_observers(&mut buf, tx);

        assert_eq!(
            buf.compare(0, 3),
            Err(BufferError::OutOfRange { index: 3, len: 3 })
        );
        assert_eq!(buf.counts(), Counters::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_move_leaves_source_empty() {
        let mut buf = InstrumentedBuffer::from(vec![7, 8]);
        buf.move_item(0, 1).unwrap();
        assert_eq!(buf.slots(), &[None, Some(7)]);
        assert_eq!(buf.accesses(), 1);
        assert_eq!(buf.reads(), 1);
        assert_eq!(buf.writes(), 1);
        assert_eq!(buf.get(0), Err(BufferError::EmptySlot { index: 0 }));
    }
}
