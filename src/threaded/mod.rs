//! Thread + rendezvous sorters
//!
//! The alternative to the state machines in [`crate::sort`]: run a plain
//! loop-and-recursion routine on a dedicated worker thread and make it wait
//! at a pause point before every buffer operation.
//!
//! # Handoff protocol
//!
//! ```text
//! driver                         worker
//!   │ spawn ───────────────────▶ runs to first pause, waits on `go`
//!   │ go: Step ────────────────▶ one buffer operation
//!   │                            runs to next pause
//!   │ ◀──────────────── ack: Paused | Finished | Failed
//! ```
//!
//! Both channels are `sync_channel(1)`. `step()` sends one `Signal::Step`
//! and blocks until the acknowledgement arrives, so completion is delivered
//! as a message on the same channel as every other step result. Cancelling
//! sends `Signal::Cancel`; the worker is always parked at a pause point at
//! that moment, so the buffer is left between two whole operations.

pub mod pacer;
pub mod routines;

use crate::buffer::{Counters, InstrumentedBuffer};
use crate::errors::{SortError, SortResult};
use crate::sort::RunState;
use pacer::{Ack, Halt, PacedBuffer, Pacer, SharedBuffer, Signal};
use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

pub type Routine<T> = fn(&mut PacedBuffer<T>) -> Result<(), Halt>;

/// Routines available for threaded execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadedAlgorithm {
    Bubble,
    Awful,
    Quick,
}

impl ThreadedAlgorithm {
    pub const ALL: [ThreadedAlgorithm; 3] = [
        ThreadedAlgorithm::Bubble,
        ThreadedAlgorithm::Awful,
        ThreadedAlgorithm::Quick,
    ];

    /// Short name used on the command line
    pub fn key(self) -> &'static str {
        match self {
            ThreadedAlgorithm::Bubble => "bubble",
            ThreadedAlgorithm::Awful => "awful",
            ThreadedAlgorithm::Quick => "quick",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThreadedAlgorithm::Bubble => "Bubble Sort (threaded)",
            ThreadedAlgorithm::Awful => "Awful Sort (threaded)",
            ThreadedAlgorithm::Quick => "Quick Sort (threaded)",
        }
    }

    pub fn routine<T: Ord + Clone>(self) -> Routine<T> {
        match self {
            ThreadedAlgorithm::Bubble => routines::bubble::<T>,
            ThreadedAlgorithm::Awful => routines::awful::<T>,
            ThreadedAlgorithm::Quick => routines::quick::<T>,
        }
    }
}

impl fmt::Display for ThreadedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThreadedAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.key() == wanted)
            .ok_or_else(|| format!("unknown threaded routine '{}'", s))
    }
}

struct Link {
    go: SyncSender<Signal>,
    ack: Receiver<Ack>,
    worker: JoinHandle<()>,
}

impl Link {
    fn join(self) {
        drop(self.go);
        if self.worker.join().is_err() {
            warn!("sort worker panicked");
        }
    }
}

/// A sort routine on a worker thread, advanced one buffer operation per
/// [`step`](ThreadedSorter::step)
pub struct ThreadedSorter<T> {
    name: &'static str,
    buffer: SharedBuffer<T>,
    routine: Option<Routine<T>>,
    link: Option<Link>,
    state: RunState,
}

impl<T: Ord + Clone + Send + 'static> ThreadedSorter<T> {
    /// The worker is spawned lazily by the first `step()`
    pub fn new(algorithm: ThreadedAlgorithm, buffer: InstrumentedBuffer<T>) -> Self {
        let state = RunState::initial(buffer.len());
        debug!(algorithm = algorithm.name(), len = buffer.len(), "threaded sorter created");
        ThreadedSorter {
            name: algorithm.name(),
            buffer: Arc::new(Mutex::new(buffer)),
            routine: Some(algorithm.routine()),
            link: None,
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn start(&mut self) -> SortResult<()> {
        let routine = self.routine.take().ok_or(SortError::WorkerLost)?;
        let (go_tx, go_rx) = sync_channel(1);
        let (ack_tx, ack_rx) = sync_channel(1);
        let buffer = Arc::clone(&self.buffer);

        let worker = thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || {
                let mut paced = PacedBuffer::new(Pacer::new(go_rx, ack_tx), buffer);
                match routine(&mut paced) {
                    Ok(()) => paced.pacer.report(Ack::Finished),
                    Err(Halt::Buffer(e)) => paced.pacer.report(Ack::Failed(e)),
                    Err(Halt::Cancelled) => {}
                }
            })
            .map_err(|_| SortError::WorkerLost)?;

        debug!(algorithm = self.name, "worker started");
        self.link = Some(Link {
            go: go_tx,
            ack: ack_rx,
            worker,
        });
        Ok(())
    }

    /// Release the worker for exactly one buffer operation and wait for it
    /// to reach its next pause point (or finish)
    pub fn step(&mut self) -> SortResult<()> {
        if !self.state.is_running() {
            return Ok(());
        }
        if self.link.is_none() {
            self.start()?;
        }
        let Some(link) = self.link.as_ref() else {
            return Err(SortError::WorkerLost);
        };

        let reply = match link.go.send(Signal::Step) {
            Ok(()) => link.ack.recv().ok(),
            Err(_) => None,
        };

        match reply {
            Some(Ack::Paused) => Ok(()),
            Some(Ack::Finished) => {
                self.state = RunState::Done;
                if let Some(link) = self.link.take() {
                    link.join();
                }
                debug!(algorithm = self.name, counts = %self.counts(), "sort complete");
                Ok(())
            }
            Some(Ack::Failed(e)) => {
                if let Some(link) = self.link.take() {
                    link.join();
                }
                Err(e.into())
            }
            None => {
                if let Some(link) = self.link.take() {
                    link.join();
                }
                Err(SortError::WorkerLost)
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == RunState::Done
    }

    /// Stop the worker at its current pause point and wait for it to exit
    pub fn cancel(&mut self) {
        if !self.state.is_running() {
            return;
        }
        if let Some(link) = self.link.take() {
            let _ = link.go.send(Signal::Cancel);
            link.join();
        }
        self.state.cancel();
        debug!(algorithm = self.name, "threaded sort cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == RunState::Cancelled
    }

    /// Run `f` against the buffer while the worker is parked
    pub fn with_buffer<R>(&self, f: impl FnOnce(&InstrumentedBuffer<T>) -> R) -> R {
        f(&self.buffer.lock())
    }

    pub fn counts(&self) -> Counters {
        self.buffer.lock().counts()
    }

    /// Stop the worker if it is still running and take the buffer back
    pub fn into_buffer(mut self) -> SortResult<InstrumentedBuffer<T>> {
        self.cancel();
        let shared = std::mem::replace(
            &mut self.buffer,
            Arc::new(Mutex::new(InstrumentedBuffer::with_len(0))),
        );
        Arc::try_unwrap(shared)
            .map(Mutex::into_inner)
            .map_err(|_| SortError::WorkerLost)
    }
}

impl<T> Drop for ThreadedSorter<T> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            let _ = link.go.send(Signal::Cancel);
            link.join();
        }
    }
}
