//! Running sorters outside the UI
//!
//! Generates the initial data for a run ([`DataLayout`]) and drives a sorter
//! to completion, summarizing what it cost in a [`RunReport`].

use crate::buffer::{Counters, InstrumentedBuffer};
use crate::errors::SortResult;
use crate::sort::{Algorithm, Sorter};
use crate::threaded::{ThreadedAlgorithm, ThreadedSorter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Initial arrangement of the values `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataLayout {
    #[default]
    Random,
    Sorted,
    Reversed,
}

impl DataLayout {
    pub const ALL: [DataLayout; 3] = [DataLayout::Random, DataLayout::Sorted, DataLayout::Reversed];

    pub fn key(self) -> &'static str {
        match self {
            DataLayout::Random => "random",
            DataLayout::Sorted => "sorted",
            DataLayout::Reversed => "reversed",
        }
    }

    /// Produce `n` distinct values in this layout. `seed` only affects
    /// `Random`.
    pub fn generate(self, n: usize, seed: u64) -> Vec<u32> {
        let mut values: Vec<u32> = (0..n as u32).collect();
        match self {
            DataLayout::Random => {
                let mut rng = StdRng::seed_from_u64(seed);
                values.shuffle(&mut rng);
            }
            DataLayout::Sorted => {}
            DataLayout::Reversed => values.reverse(),
        }
        values
    }

    pub fn next(self) -> Self {
        match self {
            DataLayout::Random => DataLayout::Sorted,
            DataLayout::Sorted => DataLayout::Reversed,
            DataLayout::Reversed => DataLayout::Random,
        }
    }
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DataLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.key() == wanted)
            .ok_or_else(|| format!("unknown layout '{}'", s))
    }
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub algorithm: &'static str,
    pub len: usize,
    /// Calls to `step()` that made progress
    pub steps: u64,
    /// Primary and scratch counters summed
    pub counts: Counters,
    pub sorted: bool,
    pub max_stack_depth: usize,
    /// The step limit ran out before the sorter finished
    pub truncated: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} n={:<5} steps={:<9} {} sorted={}",
            self.algorithm, self.len, self.steps, self.counts, self.sorted
        )?;
        if self.max_stack_depth > 0 {
            write!(f, " max_depth={}", self.max_stack_depth)?;
        }
        if self.truncated {
            f.write_str(" (step limit reached)")?;
        }
        Ok(())
    }
}

/// Step `sorter` until it is done, cancelled, or `max_steps` is reached
pub fn run_to_completion<T: Ord>(
    sorter: &mut dyn Sorter<T>,
    max_steps: Option<u64>,
) -> SortResult<RunReport> {
    let mut steps = 0;
    let mut max_stack_depth = sorter.stack_depth();

    while !sorter.is_done() && !sorter.is_cancelled() {
        if max_steps.is_some_and(|limit| steps >= limit) {
            warn!(algorithm = sorter.name(), steps, "step limit reached");
            break;
        }
        sorter.step()?;
        steps += 1;
        max_stack_depth = max_stack_depth.max(sorter.stack_depth());
    }

    Ok(RunReport {
        algorithm: sorter.name(),
        len: sorter.buffer().len(),
        steps,
        counts: sorter.total_counts(),
        sorted: sorter.buffer().is_sorted(),
        max_stack_depth,
        truncated: !sorter.is_done() && !sorter.is_cancelled(),
    })
}

/// Same as [`run_to_completion`] for a worker-thread sorter
pub fn run_threaded_to_completion<T>(
    sorter: &mut ThreadedSorter<T>,
    max_steps: Option<u64>,
) -> SortResult<RunReport>
where
    T: Ord + Clone + Send + 'static,
{
    let mut steps = 0;
    while !sorter.is_done() && !sorter.is_cancelled() {
        if max_steps.is_some_and(|limit| steps >= limit) {
            warn!(algorithm = sorter.name(), steps, "step limit reached");
            break;
        }
        sorter.step()?;
        steps += 1;
    }

    Ok(RunReport {
        algorithm: sorter.name(),
        len: sorter.with_buffer(InstrumentedBuffer::len),
        steps,
        counts: sorter.counts(),
        sorted: sorter.with_buffer(InstrumentedBuffer::is_sorted),
        max_stack_depth: 0,
        truncated: !sorter.is_done() && !sorter.is_cancelled(),
    })
}

/// Run every algorithm in `algorithms` in turn on its own copy of `values`
pub fn run_all(algorithms: &[Algorithm], values: &[u32]) -> SortResult<Vec<RunReport>> {
    algorithms
        .iter()
        .map(|alg| {
            let mut sorter = alg.build(InstrumentedBuffer::from_slice(values));
            let report = run_to_completion(sorter.as_mut(), None)?;
            debug!(algorithm = report.algorithm, steps = report.steps, "run finished");
            Ok(report)
        })
        .collect()
}

/// Run the worker-thread routines on their own copies of `values`
pub fn run_all_threaded(
    algorithms: &[ThreadedAlgorithm],
    values: &[u32],
) -> SortResult<Vec<RunReport>> {
    algorithms
        .iter()
        .map(|alg| {
            let mut sorter = ThreadedSorter::new(*alg, InstrumentedBuffer::from_slice(values));
            run_threaded_to_completion(&mut sorter, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_are_permutations() {
        for layout in DataLayout::ALL {
            let mut values = layout.generate(50, 7);
            values.sort_unstable();
            assert_eq!(values, (0..50).collect::<Vec<u32>>(), "{}", layout);
        }
    }

    #[test]
    fn test_random_layout_is_seeded() {
        assert_eq!(
            DataLayout::Random.generate(32, 42),
            DataLayout::Random.generate(32, 42)
        );
        assert_eq!(DataLayout::Reversed.generate(3, 0), vec![2, 1, 0]);
    }

    #[test]
    fn test_step_limit_truncates() {
        let mut sorter = Algorithm::Bubble.build(InstrumentedBuffer::from(vec![3, 2, 1]));
        let report = run_to_completion(sorter.as_mut(), Some(2)).unwrap();
        assert_eq!(report.steps, 2);
        assert!(report.truncated);
        assert!(!report.sorted);
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("Reversed".parse::<DataLayout>(), Ok(DataLayout::Reversed));
        assert!("zigzag".parse::<DataLayout>().is_err());
    }
}
