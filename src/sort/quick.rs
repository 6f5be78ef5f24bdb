//! Quicksort over an explicit operation stack
//!
//! Each frame stands for one pending call `quicksort(beg, end)`. A frame is
//! pushed as `Pending`; its first transition samples the pivot
//! (the element at the midpoint of the range) and turns it into an
//! `Active` partition. The partition then walks through:
//!
//! ```text
//! Partitioning ──i < j──▶ ScanLow ──▶ ScanHigh ──▶ Exchange ──▶ Partitioning
//!      │
//!      └──i >= j──▶ Splitting (pop, push children)
//! ```
//!
//! `ScanLow` and `ScanHigh` perform one comparison against the pivot per
//! step. Children are pushed larger-first so the smaller range is sorted
//! first, which keeps the stack depth logarithmic.

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::SortResult;
use std::cmp::Ordering;
use tracing::{debug, trace};

pub const NAME: &str = "Quick Sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartitionState {
    Partitioning,
    ScanLow,
    ScanHigh,
    Exchange,
    Splitting,
}

#[derive(Debug, Clone)]
struct Partition<T> {
    beg: usize,
    end: usize,
    i: isize,
    j: isize,
    pivot: T,
    state: PartitionState,
}

#[derive(Debug, Clone)]
enum QuickFrame<T> {
    /// A range whose pivot has not been sampled yet
    Pending { beg: usize, end: usize },
    Active(Partition<T>),
}

pub struct QuickSort<T> {
    buffer: InstrumentedBuffer<T>,
    state: RunState,
    stack: Vec<QuickFrame<T>>,
}

impl<T: Ord + Clone> QuickSort<T> {
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        let mut stack = Vec::new();
        if state.is_running() {
            stack.push(QuickFrame::Pending {
                beg: 0,
                end: buffer.len() - 1,
            });
        }
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        QuickSort {
            buffer,
            state,
            stack,
        }
    }

    /// Pop a finished partition and push its non-degenerate child ranges
    fn split(&mut self, beg: usize, end: usize, i: isize, j: isize) {
        self.stack.pop();

        // Each cast is guarded by its comparison: i > beg >= 0 and j > beg >= 0
        let right = (i < end as isize).then(|| (i as usize, end));
        let left = ((beg as isize) < j).then(|| (beg, j as usize));

        let children = match (left, right) {
            (Some(l), Some(r)) if l.1 - l.0 > r.1 - r.0 => [Some(l), Some(r)],
            (l, r) => [r, l],
        };
        for (beg, end) in children.into_iter().flatten() {
            trace!(beg, end, depth = self.stack.len() + 1, "push quicksort frame");
            self.stack.push(QuickFrame::Pending { beg, end });
        }

        if self.stack.is_empty() {
            self.state = RunState::Done;
            debug!(algorithm = NAME, counts = %self.buffer.counts(), "sort complete");
        }
    }
}

impl<T: Ord + Clone> Sorter<T> for QuickSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }
        let Some(top) = self.stack.last_mut() else {
            self.state = RunState::Done;
            return Ok(());
        };

        let part = match top {
            QuickFrame::Pending { beg, end } => {
                let (beg, end) = (*beg, *end);
                let pivot = self.buffer.get(beg + (end - beg) / 2)?;
                *top = QuickFrame::Active(Partition {
                    beg,
                    end,
                    i: beg as isize,
                    j: end as isize,
                    pivot,
                    state: PartitionState::Partitioning,
                });
                return Ok(());
            }
            QuickFrame::Active(part) => part,
        };

        match part.state {
            PartitionState::Partitioning => {
                part.state = if part.i < part.j {
                    PartitionState::ScanLow
                } else {
                    PartitionState::Splitting
                };
            }
            PartitionState::ScanLow => {
                if self.buffer.compare_value(part.i as usize, &part.pivot)? == Ordering::Less {
                    part.i += 1;
                } else {
                    part.state = PartitionState::ScanHigh;
                }
            }
            PartitionState::ScanHigh => {
                if self.buffer.compare_value(part.j as usize, &part.pivot)? == Ordering::Greater {
                    part.j -= 1;
                } else {
                    part.state = PartitionState::Exchange;
                }
            }
            PartitionState::Exchange => {
                if part.i < part.j {
                    self.buffer.swap(part.i as usize, part.j as usize)?;
                }
                if part.i <= part.j {
                    part.i += 1;
                    part.j -= 1;
                }
                part.state = PartitionState::Partitioning;
            }
            PartitionState::Splitting => {
                let (beg, end, i, j) = (part.beg, part.end, part.i, part.j);
                self.split(beg, end, i, j);
            }
        }
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    fn cancel(&mut self) {
        if self.state.is_running() {
            self.state.cancel();
            debug!(algorithm = NAME, depth = self.stack.len(), "sort cancelled");
        }
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

    fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}
