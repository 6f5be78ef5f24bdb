//! Steppable sorting engine
//!
//! Every algorithm is an explicit state machine implementing [`Sorter`]. The
//! caller drives it by calling [`Sorter::step`] until [`Sorter::is_done`]
//! reports completion; nothing runs in between.
//!
//! - [`bubble`], [`selection`], [`insertion`]: linear-scan machines. A few
//!   cursors fully determine the next move, and every step performs exactly
//!   one buffer operation.
//! - [`quick`], [`merge`], [`heap`]: divide-and-conquer machines. Each keeps
//!   an operation stack of tagged frames standing in for the call stack of
//!   the recursive algorithm. A step is one micro-transition of the top
//!   frame; pushing a frame is a recursive descent, popping one is a return.
//!
//! The machines take their [`InstrumentedBuffer`] by value for the length of
//! a run and hand it back through [`Sorter::into_buffer`].

pub mod bubble;
pub mod heap;
pub mod insertion;
pub mod merge;
pub mod quick;
pub mod selection;

use crate::buffer::{Counters, InstrumentedBuffer};
use crate::errors::SortResult;
use std::fmt;
use std::str::FromStr;

pub use bubble::BubbleSort;
pub use heap::HeapSort;
pub use insertion::InsertionSort;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;

/// Lifecycle of a sort run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
    Cancelled,
}

impl RunState {
    /// Buffers of length 0 or 1 are sorted before the first step
    pub fn initial(len: usize) -> Self {
        if len <= 1 {
            RunState::Done
        } else {
            RunState::Running
        }
    }

    pub fn is_running(self) -> bool {
        self == RunState::Running
    }

    /// Cancelling a finished run leaves it finished
    pub fn cancel(&mut self) {
        if *self == RunState::Running {
            *self = RunState::Cancelled;
        }
    }
}

/// The uniform interface of every steppable sorting machine
pub trait Sorter<T> {
    /// Display name of the algorithm
    fn name(&self) -> &'static str;

    /// Advance by one unit of progress. A no-op once done or cancelled.
    fn step(&mut self) -> SortResult<()>;

    fn is_done(&self) -> bool;

    /// Stop making progress at the current pause point.
    ///
    /// `is_done()` stays false and later steps do nothing.
    fn cancel(&mut self);

    fn is_cancelled(&self) -> bool;

    /// The buffer being sorted
    fn buffer(&self) -> &InstrumentedBuffer<T>;

    /// End the run and give the buffer back
    fn into_buffer(self: Box<Self>) -> InstrumentedBuffer<T>;

    fn uses_scratch_buffer(&self) -> bool {
        false
    }

    fn scratch_buffer(&self) -> Option<&InstrumentedBuffer<T>> {
        None
    }

    /// Mutable scratch access, for registering observers on it
    fn scratch_buffer_mut(&mut self) -> Option<&mut InstrumentedBuffer<T>> {
        None
    }

    /// Current depth of the operation stack (0 for linear-scan machines)
    fn stack_depth(&self) -> usize {
        0
    }

    /// Counters of the primary buffer plus the scratch buffer, if any
    fn total_counts(&self) -> Counters {
        let primary = self.buffer().counts();
        match self.scratch_buffer() {
            Some(scratch) => primary + scratch.counts(),
            None => primary,
        }
    }
}

/// The closed set of steppable algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
    Heap,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
        Algorithm::Heap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => bubble::NAME,
            Algorithm::Selection => selection::NAME,
            Algorithm::Insertion => insertion::NAME,
            Algorithm::Quick => quick::NAME,
            Algorithm::Merge => merge::NAME,
            Algorithm::Heap => heap::NAME,
        }
    }

    /// Short lowercase identifier, as accepted on the command line
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
            Algorithm::Heap => "heap",
        }
    }

    /// Construct a machine of this kind over `buffer`
    pub fn build<T>(self, buffer: InstrumentedBuffer<T>) -> Box<dyn Sorter<T>>
    where
        T: Ord + Clone + 'static,
    {
        match self {
            Algorithm::Bubble => Box::new(BubbleSort::new(buffer)),
            Algorithm::Selection => Box::new(SelectionSort::new(buffer)),
            Algorithm::Insertion => Box::new(InsertionSort::new(buffer)),
            Algorithm::Quick => Box::new(QuickSort::new(buffer)),
            Algorithm::Merge => Box::new(MergeSort::new(buffer)),
            Algorithm::Heap => Box::new(HeapSort::new(buffer)),
        }
    }

    /// The algorithm after this one, wrapping around
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.key() == wanted || a.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown algorithm '{}'", s))
    }
}
