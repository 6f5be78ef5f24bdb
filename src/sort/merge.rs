//! Top-down mergesort over an explicit operation stack
//!
//! A frame covers `[beg, end]` with `mid = (beg + end) / 2` and moves through
//! `Splitting → CopyFirst → CopySecond → Merging`:
//!
//! - `Splitting` pushes the right half, then the left half (so the left half
//!   runs first), or pops immediately for a one-element range.
//! - `CopyFirst` moves `[beg, mid]` into the scratch buffer in order.
//! - `CopySecond` moves `[mid + 1, end]` into the scratch buffer reversed, so
//!   the scratch range rises then falls and the merge needs no sentinel.
//! - `Merging` takes the smaller of the two scratch cursors (one climbing
//!   from `beg`, one descending from `end`) back into the primary buffer.
//!
//! Every copy or merge step moves one element with `remove` + `set`, so
//! while a frame is copying or merging, the elements are split between the
//! two buffers and the union of both is the permutation.

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::{BufferResult, SortResult};
use std::cmp::Ordering;
use tracing::{debug, trace, warn};

pub const NAME: &str = "Merge Sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeState {
    Splitting,
    CopyFirst,
    CopySecond,
    Merging,
}

#[derive(Debug, Clone)]
struct MergeFrame {
    beg: usize,
    mid: usize,
    end: usize,
    /// Copy cursor, then the ascending merge cursor
    i: usize,
    /// Descending merge cursor
    j: usize,
    /// Output slot in the primary buffer
    k: usize,
    state: MergeState,
}

impl MergeFrame {
    fn new(beg: usize, end: usize) -> Self {
        MergeFrame {
            beg,
            mid: beg + (end - beg) / 2,
            end,
            i: beg,
            j: end,
            k: beg,
            state: MergeState::Splitting,
        }
    }
}

pub struct MergeSort<T> {
    buffer: InstrumentedBuffer<T>,
    scratch: InstrumentedBuffer<T>,
    state: RunState,
    stack: Vec<MergeFrame>,
}

impl<T: Ord + Clone> MergeSort<T> {
    /// Sort `buffer` with a freshly allocated scratch buffer of equal length
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let scratch = InstrumentedBuffer::with_len(buffer.len());
        Self::build(buffer, scratch)
    }

    /// Sort `buffer` using a caller-supplied scratch buffer, which must have
    /// the same length
    pub fn with_scratch(
        buffer: InstrumentedBuffer<T>,
        scratch: InstrumentedBuffer<T>,
    ) -> BufferResult<Self> {
        scratch.ensure_len(buffer.len())?;
        Ok(Self::build(buffer, scratch))
    }

    fn build(buffer: InstrumentedBuffer<T>, scratch: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        let mut stack = Vec::new();
        if state.is_running() {
            stack.push(MergeFrame::new(0, buffer.len() - 1));
        }
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        MergeSort {
            buffer,
            scratch,
            state,
            stack,
        }
    }

    /// Move every element the top frame has parked in the scratch buffer
    /// back into the empty primary slots of its range, in scratch order.
    /// Only the top frame ever holds elements in scratch.
    fn restore_scratch(&mut self) -> BufferResult<()> {
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };
        let range = frame.beg..=frame.end;
        let holes: Vec<usize> = range
            .clone()
            .filter(|&i| self.buffer.slots()[i].is_none())
            .collect();
        let parked: Vec<usize> = range
            .filter(|&i| self.scratch.slots()[i].is_some())
            .collect();

        for (hole, index) in holes.into_iter().zip(parked) {
            let item = self.scratch.remove(index)?;
            self.buffer.set(hole, item)?;
        }
        Ok(())
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            trace!(beg = frame.beg, end = frame.end, "pop mergesort frame");
        }
        if self.stack.is_empty() {
            self.state = RunState::Done;
            debug!(
                algorithm = NAME,
                counts = %(self.buffer.counts() + self.scratch.counts()),
                "sort complete"
            );
        }
    }
}

impl<T: Ord + Clone> Sorter<T> for MergeSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }
        let Some(frame) = self.stack.last_mut() else {
            self.state = RunState::Done;
            return Ok(());
        };

        match frame.state {
            MergeState::Splitting => {
                if frame.beg >= frame.end {
                    self.pop();
                    return Ok(());
                }
                let (beg, mid, end) = (frame.beg, frame.mid, frame.end);
                frame.state = MergeState::CopyFirst;
                frame.i = beg;

                trace!(beg, mid, end, depth = self.stack.len() + 2, "split mergesort frame");
                self.stack.push(MergeFrame::new(mid + 1, end));
                self.stack.push(MergeFrame::new(beg, mid));
            }
            MergeState::CopyFirst => {
                let item = self.buffer.remove(frame.i)?;
                self.scratch.set(frame.i, item)?;
                frame.i += 1;
                if frame.i > frame.mid {
                    frame.state = MergeState::CopySecond;
                }
            }
            MergeState::CopySecond => {
                let target = frame.end + frame.mid + 1 - frame.i;
                let item = self.buffer.remove(frame.i)?;
                self.scratch.set(target, item)?;
                frame.i += 1;
                if frame.i > frame.end {
                    frame.state = MergeState::Merging;
                    frame.i = frame.beg;
                    frame.j = frame.end;
                    frame.k = frame.beg;
                }
            }
            MergeState::Merging => {
                // The last remaining element needs no comparison. Ties go to
                // whichever cursor holds the earlier input element: the low
                // one until the left run is used up.
                let take_low = frame.i == frame.j
                    || match self.scratch.compare(frame.i, frame.j)? {
                        Ordering::Less => true,
                        Ordering::Equal => frame.i <= frame.mid,
                        Ordering::Greater => false,
                    };

                let item = if take_low {
                    frame.i += 1;
                    self.scratch.remove(frame.i - 1)?
                } else {
                    frame.j -= 1;
                    self.scratch.remove(frame.j + 1)?
                };
                self.buffer.set(frame.k, item)?;
                frame.k += 1;

                if frame.k > frame.end {
                    self.pop();
                }
            }
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Cancelling mid-copy or mid-merge moves the parked elements back so
    /// the primary buffer alone is a permutation of its input.
    fn cancel(&mut self) {
        if !self.state.is_running() {
            return;
        }
        if let Err(e) = self.restore_scratch() {
            warn!(algorithm = NAME, error = %e, "failed to restore scratch elements");
        }
        self.state.cancel();
        debug!(algorithm = NAME, depth = self.stack.len(), "sort cancelled");
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

    fn uses_scratch_buffer(&self) -> bool {
        true
    }

    fn scratch_buffer(&self) -> Option<&InstrumentedBuffer<T>> {
        Some(&self.scratch)
    }

    fn scratch_buffer_mut(&mut self) -> Option<&mut InstrumentedBuffer<T>> {
        Some(&mut self.scratch)
    }

    fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BufferError;

    #[test]
    fn test_second_half_is_reversed_in_scratch() {
        let mut sorter = MergeSort::new(InstrumentedBuffer::from(vec![1, 5, 2, 3]));
        // Drive until the root frame has copied both halves down
        while sorter.stack.len() != 1 || sorter.stack[0].state != MergeState::Merging {
            sorter.step().unwrap();
        }
        assert_eq!(sorter.scratch.slots(), &[Some(1), Some(5), Some(3), Some(2)]);
        assert!(sorter.buffer.slots().iter().all(Option::is_none));
    }

    #[test]
    fn test_cancel_mid_merge_moves_scratch_back() {
        let mut sorter = MergeSort::new(InstrumentedBuffer::from(vec![5, 4, 3, 2, 1, 0]));
        for _ in 0..6 {
            sorter.step().unwrap();
        }
        assert!(sorter.scratch.slots().iter().any(Option::is_some));

        let before = sorter.buffer.counts() + sorter.scratch.counts();
        sorter.cancel();
        let moved = (sorter.buffer.counts() + sorter.scratch.counts()).since(&before);
        assert_eq!(moved.reads, moved.writes);
        assert!(moved.writes > 0);

        assert!(sorter.scratch.slots().iter().all(Option::is_none));
        let mut held = Box::new(sorter).into_buffer().values();
        held.sort_unstable();
        assert_eq!(held, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_scratch_size_mismatch() {
        let result = MergeSort::with_scratch(
            InstrumentedBuffer::from(vec![3, 2, 1]),
            InstrumentedBuffer::with_len(2),
        );
        assert!(matches!(
            result,
            Err(BufferError::SizeMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
