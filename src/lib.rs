//! # Introduction
//!
//! sortty exposes classic sorting algorithms as *steppable* machines: an
//! external driver calls [`sort::Sorter::step`] repeatedly, and each call
//! advances the sort by exactly one unit of progress (one comparison, one
//! swap, one element moved, or one state transition). Every element access
//! goes through an [`buffer::InstrumentedBuffer`] that counts it and reports
//! it to observers, which is what the terminal visualizer draws.
//!
//! ## Pipeline
//!
//! ```text
//! DataLayout → InstrumentedBuffer → Sorter::step → observers → TUI / report
//! ```
//!
//! 1. [`buffer`]: the instrumented buffer, its [`buffer::Counters`] and
//!    observer callbacks.
//! 2. [`sort`]: the six state machines (bubble, selection, insertion,
//!    quick, merge, heap) behind the [`sort::Sorter`] trait. The recursive
//!    ones keep an explicit operation stack of frames.
//! 3. [`threaded`]: the same idea done with a worker thread that parks at
//!    a pause point before every buffer operation.
//! 4. [`driver`]: initial data layouts and run-to-completion reports.
//! 5. [`config`]: command-line arguments.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use sortty::buffer::InstrumentedBuffer;
//! use sortty::sort::{Algorithm, Sorter};
//!
//! let mut sorter = Algorithm::Heap.build(InstrumentedBuffer::from(vec![3, 1, 2]));
//! while !sorter.is_done() {
//!     sorter.step().unwrap();
//! }
//! assert_eq!(sorter.buffer().values(), vec![1, 2, 3]);
//! ```

pub mod buffer;
pub mod config;
pub mod driver;
pub mod errors;
pub mod sort;
pub mod threaded;
pub mod ui;
