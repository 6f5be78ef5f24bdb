//! Heapsort over an explicit operation stack
//!
//! The bottom frame drives the two phases: `BuildHeap` pushes a `Heapify`
//! frame for every internal node from `len / 2 - 1` down to the root, then
//! becomes `Extract`, which swaps the root with the heap boundary and pushes
//! a `Heapify` over the shrunk heap until the boundary reaches the root.
//!
//! A `Heapify` frame is one pending call of the recursive sift-down:
//!
//! - `CheckLeft`: compare the left child with the running largest.
//! - `CheckRight`: compare the right child with the running largest.
//! - `Sift`: swap the root with the largest child and push a `Heapify` for
//!   that child.
//!
//! When the root is already the largest after the checks, the frame returns
//! (pops) on the same step.

use super::{RunState, Sorter};
use crate::buffer::InstrumentedBuffer;
use crate::errors::SortResult;
use std::cmp::Ordering;
use tracing::{debug, trace};

pub const NAME: &str = "Heap Sort";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeapifyState {
    CheckLeft,
    CheckRight,
    Sift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeapFrame {
    /// Internal nodes `0..remaining` still need a heapify, highest first
    BuildHeap { remaining: usize },
    /// The heap occupies `[0, boundary]`
    Extract { boundary: usize },
    Heapify {
        root: usize,
        size: usize,
        largest: usize,
        state: HeapifyState,
    },
}

impl HeapFrame {
    fn heapify(root: usize, size: usize) -> Self {
        HeapFrame::Heapify {
            root,
            size,
            largest: root,
            state: HeapifyState::CheckLeft,
        }
    }
}

fn left_child(node: usize) -> usize {
    2 * node + 1
}

fn right_child(node: usize) -> usize {
    2 * node + 2
}

pub struct HeapSort<T> {
    buffer: InstrumentedBuffer<T>,
    state: RunState,
    stack: Vec<HeapFrame>,
}

impl<T: Ord + Clone> HeapSort<T> {
    pub fn new(buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        let mut stack = Vec::new();
        if state.is_running() {
            stack.push(HeapFrame::BuildHeap {
                remaining: buffer.len() / 2,
            });
        }
        debug!(algorithm = NAME, len = buffer.len(), "sorter created");
        HeapSort {
            buffer,
            state,
            stack,
        }
    }

    fn push_heapify(&mut self, root: usize, size: usize) {
        // Leaves are already heaps
        if left_child(root) < size {
            trace!(root, size, depth = self.stack.len() + 1, "push heapify frame");
            self.stack.push(HeapFrame::heapify(root, size));
        }
    }

    fn pop(&mut self) {
        self.stack.pop();
        if self.stack.is_empty() {
            self.state = RunState::Done;
            debug!(algorithm = NAME, counts = %self.buffer.counts(), "sort complete");
        }
    }
}

impl<T: Ord + Clone> Sorter<T> for HeapSort<T> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }
        let len = self.buffer.len();
        let Some(top) = self.stack.last_mut() else {
            self.state = RunState::Done;
            return Ok(());
        };

        match top {
            HeapFrame::BuildHeap { remaining } => {
                *remaining -= 1;
                let node = *remaining;
                if node == 0 {
                    *top = HeapFrame::Extract { boundary: len - 1 };
                }
                self.push_heapify(node, len);
            }
            HeapFrame::Extract { boundary } => {
                let last = *boundary;
                self.buffer.swap(0, last)?;
                if last > 1 {
                    *boundary -= 1;
                } else {
                    self.pop();
                }
                self.push_heapify(0, last);
            }
            HeapFrame::Heapify {
                root,
                size,
                largest,
                state,
            } => match *state {
                HeapifyState::CheckLeft => {
                    let left = left_child(*root);
                    if self.buffer.compare(left, *largest)? == Ordering::Greater {
                        *largest = left;
                    }
                    if right_child(*root) < *size {
                        *state = HeapifyState::CheckRight;
                    } else if *largest != *root {
                        *state = HeapifyState::Sift;
                    } else {
                        self.pop();
                    }
                }
                HeapifyState::CheckRight => {
                    let right = right_child(*root);
                    if self.buffer.compare(right, *largest)? == Ordering::Greater {
                        *largest = right;
                    }
                    if *largest != *root {
                        *state = HeapifyState::Sift;
                    } else {
                        self.pop();
                    }
                }
                HeapifyState::Sift => {
                    let (root, size, largest) = (*root, *size, *largest);
                    self.buffer.swap(root, largest)?;
                    self.pop();
                    self.push_heapify(largest, size);
                }
            },
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_phase_produces_max_heap() {
        let mut sorter = HeapSort::new(InstrumentedBuffer::from(vec![3, 1, 4, 1, 5, 9, 2, 6]));
        while !matches!(sorter.stack.as_slice(), [HeapFrame::Extract { .. }]) {
            sorter.step().unwrap();
        }

        let heap = sorter.buffer().values();
        for node in 0..heap.len() {
            for child in [left_child(node), right_child(node)] {
                if child < heap.len() {
                    assert!(heap[node] >= heap[child], "heap violated at {}", node);
                }
            }
        }
        assert_eq!(heap[0], 9);
    }

    #[test]
    fn test_single_element_is_done() {
        let sorter = HeapSort::new(InstrumentedBuffer::from(vec![1]));
        assert!(sorter.is_done());
        assert_eq!(sorter.stack_depth(), 0);
    }
}
