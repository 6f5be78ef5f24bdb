//! Pause points for sort routines running on a worker thread

use crate::buffer::InstrumentedBuffer;
use crate::errors::BufferError;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::sync::mpsc::{Receiver, SyncSender};
use std::sync::Arc;

pub type SharedBuffer<T> = Arc<Mutex<InstrumentedBuffer<T>>>;

/// Driver → worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Perform one buffer operation, then report at the next pause point
    Step,
    Cancel,
}

/// Worker → driver, sent once per `Signal::Step`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// Reached the next pause point
    Paused,
    /// The routine returned; no further pause points
    Finished,
    Failed(BufferError),
}

/// Why a routine stopped before finishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    Cancelled,
    Buffer(BufferError),
}

impl From<BufferError> for Halt {
    fn from(e: BufferError) -> Self {
        Halt::Buffer(e)
    }
}

/// The worker's end of the rendezvous
pub struct Pacer {
    go: Receiver<Signal>,
    ack: SyncSender<Ack>,
    primed: bool,
}

impl Pacer {
    pub(crate) fn new(go: Receiver<Signal>, ack: SyncSender<Ack>) -> Self {
        Pacer {
            go,
            ack,
            primed: false,
        }
    }

    /// Block until the driver asks for the next operation.
    ///
    /// Every pause after the first also acknowledges the step that led here.
    pub fn pause(&mut self) -> Result<(), Halt> {
        if self.primed {
            self.ack.send(Ack::Paused).map_err(|_| Halt::Cancelled)?;
        }
        self.primed = true;

        match self.go.recv() {
            Ok(Signal::Step) => Ok(()),
            Ok(Signal::Cancel) | Err(_) => Err(Halt::Cancelled),
        }
    }

    pub(crate) fn report(&self, ack: Ack) {
        // The driver may already be gone; nothing left to tell it then
        let _ = self.ack.send(ack);
    }
}

/// A shared buffer whose every operation waits at a pause point first.
///
/// The lock is held only for the duration of the single operation.
pub struct PacedBuffer<T> {
    pub(crate) pacer: Pacer,
    buffer: SharedBuffer<T>,
    len: usize,
}

impl<T: Ord + Clone> PacedBuffer<T> {
    pub(crate) fn new(pacer: Pacer, buffer: SharedBuffer<T>) -> Self {
        let len = buffer.lock().len();
        PacedBuffer { pacer, buffer, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&mut self, index: usize) -> Result<T, Halt> {
        self.pacer.pause()?;
        Ok(self.buffer.lock().get(index)?)
    }

    pub fn compare(&mut self, a: usize, b: usize) -> Result<Ordering, Halt> {
        self.pacer.pause()?;
        Ok(self.buffer.lock().compare(a, b)?)
    }

    pub fn compare_value(&mut self, index: usize, value: &T) -> Result<Ordering, Halt> {
        self.pacer.pause()?;
        Ok(self.buffer.lock().compare_value(index, value)?)
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), Halt> {
        self.pacer.pause()?;
        Ok(self.buffer.lock().swap(a, b)?)
    }
}
