//! Selection sort

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::SortResult;
use std::cmp::Ordering;
use tracing::debug;

pub const NAME: &str = "Selection Sort";

/// Scans the unsorted tail for its minimum, one compare per step, then swaps
/// the minimum into place on a step of its own. The swap is skipped when the
/// minimum is already in place.
pub struct SelectionSort<T> {
    buffer: InstrumentedBuffer<T>,
    state: RunState,
    outer: usize,
    candidate: usize,
    min: usize,
    pending_swap: bool,
}

impl<T: Ord + Clone> SelectionSort<T> {
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        SelectionSort {
            buffer,
            state,
            outer: 0,
            candidate: 1,
            min: 0,
            pending_swap: false,
        }
    }

    fn next_outer(&mut self) {
        self.outer += 1;
        self.candidate = self.outer + 1;
        self.min = self.outer;

        if self.outer + 1 >= self.buffer.len() {
            self.state = RunState::Done;
            debug!(algorithm = NAME, counts = %self.buffer.counts(), "sort complete");
        }
    }
}

impl<T: Ord + Clone> Sorter<T> for SelectionSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }

        if self.pending_swap {
            self.buffer.swap(self.outer, self.min)?;
            self.pending_swap = false;
            self.next_outer();
            return Ok(());
        }

        if self.buffer.compare(self.min, self.candidate)? == Ordering::Greater {
            self.min = self.candidate;
        }
        self.candidate += 1;

        if self.candidate >= self.buffer.len() {
            if self.min != self.outer {
                self.pending_swap = true;
            } else {
                self.next_outer();
            }
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    fn cancel(&mut self) {
        self.state.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.state == RunState::Cancelled
    }

    fn buffer(&self) -> &InstrumentedBuffer<T> {
        &self.buffer
    }

    fn into_buffer(self: Box<Self>) -> InstrumentedBuffer<T> {
        self.buffer
    }
}
