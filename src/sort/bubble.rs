//! Bubble sort
//!
//! Compares neighbouring pairs left to right. An out-of-order pair is
//! swapped on the following step, so every step is exactly one compare or
//! one swap. Each pass carries the largest remaining element to the upper
//! bound, which then shrinks by one. A pass without swaps ends the sort.

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::SortResult;
use std::cmp::Ordering;
use tracing::debug;

pub const NAME: &str = "Bubble Sort";

pub struct BubbleSort<T> {
    buffer: InstrumentedBuffer<T>,
    state: RunState,
    /// Left index of the pair under inspection
    index: usize,
    /// Last left index of the current pass, exclusive
    bound: usize,
    swapped: bool,
    pending_swap: bool,
}

impl<T: Ord + Clone> BubbleSort<T> {
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        let bound = buffer.len().saturating_sub(1);
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        BubbleSort {
            buffer,
            state,
            index: 0,
            bound,
            swapped: false,
            pending_swap: false,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        if self.index < self.bound {
            return;
        }

        if !self.swapped || self.bound <= 1 {
            self.state = RunState::Done;
            debug!(algorithm = NAME, counts = %self.buffer.counts(), "sort complete");
        } else {
            self.bound -= 1;
            self.index = 0;
            self.swapped = false;
        }
    }
}

impl<T: Ord + Clone> Sorter<T> for BubbleSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }

        if self.pending_swap {
            self.buffer.swap(self.index, self.index + 1)?;
            self.pending_swap = false;
            self.swapped = true;
            self.advance();
        } else if self.buffer.compare(self.index, self.index + 1)? == Ordering::Greater {
            self.pending_swap = true;
        } else {
            self.advance();
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
