// Scenario tests for the steppable sorting machines

use sortty::buffer::{channel_observers, Counters, InstrumentedBuffer};
use sortty::driver::{run_to_completion, DataLayout};
use sortty::sort::{Algorithm, BubbleSort, MergeSort, SelectionSort, Sorter};
use std::sync::mpsc;

fn drive(sorter: &mut dyn Sorter<u32>) -> u64 {
    let mut steps = 0;
    while !sorter.is_done() {
        sorter.step().expect("step failed");
        steps += 1;
        assert!(steps < 10_000_000, "{} did not terminate", sorter.name());
    }
    steps
}

fn sorted_copy(values: &[u32]) -> Vec<u32> {
    let mut v = values.to_vec();
    v.sort_unstable();
    v
}

/// The cost signature of exactly one buffer operation
fn is_single_operation(d: Counters) -> bool {
    let signature = (d.accesses, d.reads, d.writes, d.compares, d.swaps);
    matches!(
        signature,
        (2, 2, 0, 1, 0) // compare
            | (1, 1, 0, 1, 0) // compare_value
            | (4, 2, 2, 0, 1) // swap
            | (1, 0, 1, 0, 0) // set
            | (1, 1, 0, 0, 0) // get / remove
            | (1, 1, 1, 0, 0) // move_item
    )
}

fn log2_ceil(n: usize) -> usize {
    (usize::BITS - n.next_power_of_two().leading_zeros() - 1) as usize
}

#[test]
fn test_every_algorithm_sorts_every_layout() {
    for layout in DataLayout::ALL {
        let values = layout.generate(97, 11);
        for alg in Algorithm::ALL {
            let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
            drive(sorter.as_mut());
            assert_eq!(
                sorter.buffer().values(),
                sorted_copy(&values),
                "{} on {} layout",
                alg,
                layout
            );
            assert!(sorter.buffer().is_sorted());
            if let Some(scratch) = sorter.scratch_buffer() {
                assert!(scratch.slots().iter().all(Option::is_none));
            }
        }
    }
}

#[test]
fn test_duplicates_are_sorted() {
    let values = vec![3, 1, 3, 0, 1, 3, 2, 0, 0, 3];
    for alg in Algorithm::ALL {
        let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
        drive(sorter.as_mut());
        assert_eq!(sorter.buffer().values(), sorted_copy(&values), "{}", alg);
    }
}

#[test]
fn test_step_after_done_is_noop() {
    for alg in Algorithm::ALL {
        let mut sorter = alg.build(InstrumentedBuffer::from(vec![4u32, 2, 7, 1]));
        drive(sorter.as_mut());

        let counts = sorter.total_counts();
        let values = sorter.buffer().values();
        for _ in 0..3 {
            sorter.step().unwrap();
        }
        assert!(sorter.is_done());
        assert_eq!(sorter.total_counts(), counts, "{}", alg);
        assert_eq!(sorter.buffer().values(), values);
        assert_eq!(sorter.stack_depth(), 0);
    }
}

#[test]
fn test_trivial_inputs_fire_no_observers() {
    for values in [vec![], vec![42u32]] {
        for alg in Algorithm::ALL {
            let (tx, rx) = mpsc::channel();
            let mut buffer = InstrumentedBuffer::from(values.clone());
            channel_observers(&mut buffer, tx);

            let mut sorter = alg.build(buffer);
            assert!(sorter.is_done(), "{} with {} elements", alg, values.len());
            sorter.step().unwrap();

            assert_eq!(sorter.total_counts(), Counters::default());
            assert!(rx.try_recv().is_err());
            assert_eq!(sorter.buffer().values(), values);
        }
    }
}

#[test]
fn test_heap_single_element() {
    let mut sorter = Algorithm::Heap.build(InstrumentedBuffer::from(vec![1u32]));
    assert!(sorter.is_done());
    assert_eq!(sorter.stack_depth(), 0);
    sorter.step().unwrap();
    assert_eq!(sorter.buffer().counts(), Counters::default());
}

#[test]
fn test_selection_compare_count() {
    for n in [2usize, 5, 16, 33] {
        let values = DataLayout::Random.generate(n, n as u64);
        let mut sorter = SelectionSort::new(InstrumentedBuffer::from_slice(&values));
        drive(&mut sorter);

        let n = n as u64;
        assert_eq!(sorter.buffer().compares(), n * (n - 1) / 2);
        assert!(sorter.buffer().swaps() <= n - 1);
    }
}

#[test]
fn test_selection_skips_swap_when_in_place() {
    let mut sorter = SelectionSort::new(InstrumentedBuffer::from(vec![1u32, 2, 3]));
    let steps = drive(&mut sorter);
    assert_eq!(sorter.buffer().swaps(), 0);
    assert_eq!(steps, 3);
}

#[test]
fn test_bubble_swaps_equal_inversions() {
    let mut sorter = BubbleSort::new(InstrumentedBuffer::from(vec![5u32, 3, 4, 1, 2]));
    drive(&mut sorter);
    assert_eq!(sorter.buffer().values(), vec![1, 2, 3, 4, 5]);
    assert_eq!(sorter.buffer().swaps(), 8);
}

#[test]
fn test_merge_two_elements() {
    let mut sorter = MergeSort::new(InstrumentedBuffer::from(vec![2u32, 1]));
    let mut saw_full_scratch = false;

    while !sorter.is_done() {
        sorter.step().unwrap();
        let scratch = sorter.scratch_buffer().map(|s| s.slots().to_vec());
        if scratch == Some(vec![Some(2), Some(1)]) {
            saw_full_scratch = true;
            assert_eq!(sorter.buffer().slots(), &[None, None]);
            assert_eq!(sorter.total_counts().compares, 0);
        }
    }

    assert!(saw_full_scratch);
    assert_eq!(sorter.buffer().values(), vec![1, 2]);
    assert_eq!(sorter.total_counts().compares, 1);
}

#[test]
fn test_merge_is_stable_on_ties() {
    // Pairs ordered by key only; the tag records input order
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Keyed(u32, usize);
    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Keyed {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    let keys = [2, 1, 2, 0, 1, 2, 0];
    let items: Vec<Keyed> = keys.iter().enumerate().map(|(i, k)| Keyed(*k, i)).collect();
    let mut sorter = MergeSort::new(InstrumentedBuffer::from(items));
    while !sorter.is_done() {
        sorter.step().unwrap();
    }

    let out = sorter.buffer().values();
    for pair in out.windows(2) {
        if pair[0].0 == pair[1].0 {
            assert!(pair[0].1 < pair[1].1, "unstable at {:?}", pair);
        }
    }
}

#[test]
fn test_linear_machines_do_one_operation_per_step() {
    for alg in [Algorithm::Bubble, Algorithm::Selection, Algorithm::Insertion] {
        let values = DataLayout::Random.generate(40, 5);
        let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
        while !sorter.is_done() {
            let before = sorter.total_counts();
            sorter.step().unwrap();
            let delta = sorter.total_counts().since(&before);
            assert!(is_single_operation(delta), "{}: {:?}", alg, delta);
        }
    }
}

#[test]
fn test_stack_machines_do_at_most_one_operation_per_step() {
    for alg in [Algorithm::Quick, Algorithm::Heap] {
        let values = DataLayout::Random.generate(60, 9);
        let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
        while !sorter.is_done() {
            let before = sorter.total_counts();
            sorter.step().unwrap();
            let delta = sorter.total_counts().since(&before);
            assert!(
                delta == Counters::default() || is_single_operation(delta),
                "{}: {:?}",
                alg,
                delta
            );
        }
    }
}

#[test]
fn test_merge_moves_one_element_per_step() {
    const REMOVE: (u64, u64, u64, u64, u64) = (1, 1, 0, 0, 0);
    const SET: (u64, u64, u64, u64, u64) = (1, 0, 1, 0, 0);
    const COMPARE_THEN_REMOVE: (u64, u64, u64, u64, u64) = (3, 3, 0, 1, 0);
    let signature = |d: Counters| (d.accesses, d.reads, d.writes, d.compares, d.swaps);

    let n = 37;
    let values = DataLayout::Random.generate(n, 13);
    let mut sorter = MergeSort::new(InstrumentedBuffer::from_slice(&values));

    let (mut splits, mut copies, mut compared, mut uncompared) = (0, 0, 0, 0);
    while !sorter.is_done() {
        let primary_before = sorter.buffer().counts();
        let scratch_before = sorter.scratch_buffer().unwrap().counts();
        sorter.step().unwrap();
        let primary = signature(sorter.buffer().counts().since(&primary_before));
        let scratch = signature(sorter.scratch_buffer().unwrap().counts().since(&scratch_before));

        match (primary, scratch) {
            (p, s) if p == signature(Counters::default()) && p == s => splits += 1,
            (REMOVE, SET) => copies += 1,
            (SET, REMOVE) => uncompared += 1,
            (SET, COMPARE_THEN_REMOVE) => compared += 1,
            other => panic!("unexpected step cost {:?}", other),
        }
    }

    // One split step per frame, and one uncompared merge step per
    // non-leaf frame (its last element)
    assert_eq!(splits, 2 * n - 1);
    assert_eq!(uncompared, n - 1);
    assert_eq!(copies, compared + uncompared);
    assert_eq!(sorter.scratch_buffer().unwrap().compares(), compared as u64);
    assert_eq!(sorter.buffer().values(), sorted_copy(&values));
}

#[test]
fn test_divide_and_conquer_stack_depth_is_logarithmic() {
    let n = 1024;
    let bound = 3 * log2_ceil(n) + 3;
    for layout in DataLayout::ALL {
        let values = layout.generate(n, 3);
        for alg in [Algorithm::Quick, Algorithm::Merge] {
            let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
            let report = run_to_completion(sorter.as_mut(), None).unwrap();
            assert!(report.sorted);
            assert!(
                report.max_stack_depth <= bound,
                "{} on {}: depth {} > {}",
                alg,
                layout,
                report.max_stack_depth,
                bound
            );
        }
    }
}

#[test]
fn test_cancel_stops_progress_and_keeps_permutation() {
    let values = DataLayout::Random.generate(30, 21);
    for alg in Algorithm::ALL {
        for cut in [1usize, 7, 50, 200] {
            let mut sorter = alg.build(InstrumentedBuffer::from_slice(&values));
            for _ in 0..cut {
                if sorter.is_done() {
                    break;
                }
                sorter.step().unwrap();
            }
            if sorter.is_done() {
                continue;
            }

            sorter.cancel();
            assert!(sorter.is_cancelled());
            assert!(!sorter.is_done());

            let counts = sorter.total_counts();
            sorter.step().unwrap();
            assert_eq!(sorter.total_counts(), counts, "{} progressed after cancel", alg);

            let held = sorter.buffer().values();
            assert_eq!(sorted_copy(&held), sorted_copy(&values), "{} after {} steps", alg, cut);
            if let Some(scratch) = sorter.scratch_buffer() {
                assert!(scratch.slots().iter().all(Option::is_none));
            }
            assert_eq!(sorter.into_buffer().values().len(), values.len());
        }
    }
}

#[test]
fn test_into_buffer_returns_sorted_buffer() {
    let mut sorter = Algorithm::Insertion.build(InstrumentedBuffer::from(vec![9u32, 3, 6]));
    drive(sorter.as_mut());
    let buffer = sorter.into_buffer();
    assert_eq!(buffer.values(), vec![3, 6, 9]);
    assert!(buffer.compares() > 0);
}

#[test]
fn test_algorithm_names_and_parsing() {
    for alg in Algorithm::ALL {
        assert_eq!(alg.key().parse::<Algorithm>(), Ok(alg));
        assert_eq!(alg.name().parse::<Algorithm>(), Ok(alg));
        let sorter = alg.build(InstrumentedBuffer::from(vec![1u32]));
        assert_eq!(sorter.name(), alg.name());
    }
    assert!("bogo".parse::<Algorithm>().is_err());
    assert_eq!(Algorithm::Heap.next(), Algorithm::Bubble);
    assert!(Algorithm::Merge.build(InstrumentedBuffer::<u32>::with_len(0)).uses_scratch_buffer());
    assert!(!Algorithm::Quick.build(InstrumentedBuffer::<u32>::with_len(0)).uses_scratch_buffer());
}
