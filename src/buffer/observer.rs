//! Single-slot observers for buffer instrumentation
//!
//! A buffer has exactly three observer slots: access, change and compare.
//! Registering a callback replaces whatever was in that slot; there is no
//! subscriber list. Callbacks must be `Send` so a buffer can be handed to a
//! worker thread by [`ThreadedSorter`](crate::threaded::ThreadedSorter).
//!
//! [`channel_observers`] wires all three slots to an `mpsc` channel of
//! [`BufferEvent`]s, which is how the TUI (and many tests) consume them.

use super::InstrumentedBuffer;
use std::sync::mpsc::Sender;

/// `on_access(index, value)`
pub type AccessFn<T> = Box<dyn FnMut(usize, Option<&T>) + Send>;

/// `on_change(index, old, new)`; `None` marks an empty slot
pub type ChangeFn<T> = Box<dyn FnMut(usize, Option<&T>, Option<&T>) + Send>;

/// `on_compare(index_a, index_b, value_a, value_b)`; `index_b` is `None` when
/// the element was compared against a value held outside the buffer
pub type CompareFn<T> = Box<dyn FnMut(usize, Option<usize>, Option<&T>, Option<&T>) + Send>;

pub(crate) struct Observers<T> {
    access: Option<AccessFn<T>>,
    change: Option<ChangeFn<T>>,
    compare: Option<CompareFn<T>>,
}

impl<T> Observers<T> {
    pub(crate) fn new() -> Self {
        Observers {
            access: None,
            change: None,
            compare: None,
        }
    }

    pub(crate) fn set_access(&mut self, f: AccessFn<T>) {
        self.access = Some(f);
    }

    pub(crate) fn set_change(&mut self, f: ChangeFn<T>) {
        self.change = Some(f);
    }

    pub(crate) fn set_compare(&mut self, f: CompareFn<T>) {
        self.compare = Some(f);
    }

    pub(crate) fn clear(&mut self) {
        self.access = None;
        self.change = None;
        self.compare = None;
    }

    pub(crate) fn access(&mut self, index: usize, value: Option<&T>) {
        if let Some(f) = self.access.as_mut() {
            f(index, value);
        }
    }

    pub(crate) fn change(&mut self, index: usize, old: Option<&T>, new: Option<&T>) {
        if let Some(f) = self.change.as_mut() {
            f(index, old, new);
        }
    }

    pub(crate) fn compare(
        &mut self,
        a: usize,
        b: Option<usize>,
        value_a: Option<&T>,
        value_b: Option<&T>,
    ) {
        if let Some(f) = self.compare.as_mut() {
            f(a, b, value_a, value_b);
        }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.access.is_some() || self.change.is_some() || self.compare.is_some()
    }
}

/// An owned record of one observer callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEvent<T> {
    Access {
        index: usize,
        value: Option<T>,
    },
    Change {
        index: usize,
        old: Option<T>,
        new: Option<T>,
    },
    Compare {
        a: usize,
        b: Option<usize>,
        value_a: Option<T>,
        value_b: Option<T>,
    },
}

/// Route all three observer slots of `buffer` into `tx`.
///
/// Replaces any previously registered callbacks. Events are dropped silently
/// once the receiving side has hung up.
pub fn channel_observers<T>(buffer: &mut InstrumentedBuffer<T>, tx: Sender<BufferEvent<T>>)
where
    T: Clone + Send + 'static,
{
    let access_tx = tx.clone();
    buffer.on_access(move |index, value| {
        let _ = access_tx.send(BufferEvent::Access {
            index,
            value: value.cloned(),
        });
    });

    let change_tx = tx.clone();
    buffer.on_change(move |index, old, new| {
        let _ = change_tx.send(BufferEvent::Change {
            index,
            old: old.cloned(),
            new: new.cloned(),
        });
    });

    buffer.on_compare(move |a, b, value_a, value_b| {
        let _ = tx.send(BufferEvent::Compare {
            a,
            b,
            value_a: value_a.cloned(),
            value_b: value_b.cloned(),
        });
    });
}
