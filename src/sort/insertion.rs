//! Insertion sort
//!
//! The element at the outer cursor is lifted out of the buffer (leaving its
//! slot empty) and held by the machine. Predecessors that compare greater
//! are moved one slot right into the hole, one per step, until the lifted
//! element can be placed.
//!
//! ```text
//! Lift ──▶ Probe ──greater──▶ Shift ──▶ Probe
//!            │
//!            └──otherwise──▶ Place ──▶ Lift (next outer)
//! ```

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::SortResult;
use std::cmp::Ordering;
use tracing::{debug, warn};

pub const NAME: &str = "Insertion Sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Lift,
    Probe,
    Shift,
    Place,
}

pub struct InsertionSort<T> {
    buffer: InstrumentedBuffer<T>,
    state: RunState,
    outer: usize,
    /// The empty slot the lifted element will eventually land in
    hole: usize,
    lifted: Option<T>,
    phase: Phase,
}

impl<T: Ord + Clone> InsertionSort<T> {
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        InsertionSort {
            buffer,
            state,
            outer: 1,
            hole: 1,
            lifted: None,
            phase: Phase::Lift,
        }
    }

    fn place(&mut self) -> SortResult<()> {
        if let Some(item) = self.lifted.take() {
            self.buffer.set(self.hole, item)?;
        }

        self.outer += 1;
        if self.outer >= self.buffer.len() {
            self.state = RunState::Done;
            debug!(algorithm = NAME, counts = %self.buffer.counts(), "sort complete");
        } else {
            self.phase = Phase::Lift;
        }
        Ok(())
    }
}

impl<T: Ord + Clone> Sorter<T> for InsertionSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }

        match self.phase {
            Phase::Lift => {
                self.lifted = Some(self.buffer.remove(self.outer)?);
                self.hole = self.outer;
                self.phase = Phase::Probe;
            }
            Phase::Probe => {
                if self.hole == 0 {
                    return self.place();
                }
                let greater = match &self.lifted {
                    Some(item) => {
                        self.buffer.compare_value(self.hole - 1, item)? == Ordering::Greater
                    }
                    None => false,
                };
                self.phase = if greater { Phase::Shift } else { Phase::Place };
            }
            Phase::Shift => {
                self.buffer.move_item(self.hole - 1, self.hole)?;
                self.hole -= 1;
                self.phase = Phase::Probe;
            }
            Phase::Place => self.place()?,
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Cancelling with an element lifted puts it back into the hole so the
    /// buffer stays a permutation of its input.
    fn cancel(&mut self) {
        if !self.state.is_running() {
            return;
        }
        if let Some(item) = self.lifted.take() {
            if let Err(e) = self.buffer.set(self.hole, item) {
                warn!(algorithm = NAME, error = %e, "failed to restore lifted element");
            }
        }
        self.state.cancel();
        debug!(algorithm = NAME, "sort cancelled");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_restores_lifted_element() {
        let mut sorter = InsertionSort::new(InstrumentedBuffer::from(vec![3, 1, 2]));
        sorter.step().unwrap(); // lift 1
        assert_eq!(sorter.buffer().slots()[1], None);

        sorter.cancel();
        assert!(sorter.is_cancelled());
        assert!(!sorter.is_done());
        assert_eq!(sorter.buffer().values(), vec![3, 1, 2]);
    }
}
