//! Operation counters kept by every instrumented buffer

use std::fmt;
use std::ops::{Add, AddAssign};

/// Running totals of buffer operations.
///
/// Counters only grow; the owning buffer zeroes them together through
/// [`InstrumentedBuffer::reset_counts`](super::InstrumentedBuffer::reset_counts).
/// Totals from a primary and a scratch buffer can be summed with `+`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub accesses: u64,
    pub reads: u64,
    pub writes: u64,
    pub compares: u64,
    pub swaps: u64,
}

impl Counters {
    /// Difference between two snapshots of the same buffer's counters
    pub fn since(&self, earlier: &Counters) -> Counters {
        Counters {
            accesses: self.accesses.saturating_sub(earlier.accesses),
            reads: self.reads.saturating_sub(earlier.reads),
            writes: self.writes.saturating_sub(earlier.writes),
            compares: self.compares.saturating_sub(earlier.compares),
            swaps: self.swaps.saturating_sub(earlier.swaps),
        }
    }

    pub(crate) fn read(&mut self, n: u64) {
        self.accesses += n;
        self.reads += n;
    }

    pub(crate) fn write(&mut self, n: u64) {
        self.accesses += n;
        self.writes += n;
    }
}

impl Add for Counters {
    type Output = Counters;

    fn add(mut self, rhs: Counters) -> Counters {
        self += rhs;
        self
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, rhs: Counters) {
        self.accesses += rhs.accesses;
        self.reads += rhs.reads;
        self.writes += rhs.writes;
        self.compares += rhs.compares;
        self.swaps += rhs.swaps;
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accesses={} reads={} writes={} compares={} swaps={}",
            self.accesses, self.reads, self.writes, self.compares, self.swaps
        )
    }
}
