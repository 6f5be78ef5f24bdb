// Property tests: every machine sorts arbitrary input and keeps it a
// permutation at every step

use proptest::prelude::*;
use sortty::buffer::InstrumentedBuffer;
use sortty::sort::{Algorithm, Sorter};

fn algorithm() -> impl Strategy<Value = Algorithm> {
    prop::sample::select(Algorithm::ALL.to_vec())
}

fn held_values(sorter: &dyn Sorter<i16>) -> Vec<i16> {
    let mut held = sorter.buffer().values();
    if let Some(scratch) = sorter.scratch_buffer() {
        held.extend(scratch.values());
    }
    held.sort_unstable();
    held
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sorts_like_std(alg in algorithm(), values in prop::collection::vec(any::<i16>(), 0..80)) {
        let mut expected = values.clone();
        expected.sort();

        let mut sorter = alg.build(InstrumentedBuffer::from(values));
        let mut steps = 0u64;
        while !sorter.is_done() {
            sorter.step().unwrap();
            steps += 1;
            prop_assert!(steps < 1_000_000);
        }
        prop_assert_eq!(sorter.buffer().values(), expected);
        prop_assert_eq!(sorter.stack_depth(), 0);
    }

    #[test]
    fn prop_permutation_holds_between_steps(
        alg in algorithm(),
        values in prop::collection::vec(0i16..20, 2..40),
    ) {
        let mut expected = values.clone();
        expected.sort();

        let mut sorter = alg.build(InstrumentedBuffer::from(values));
        while !sorter.is_done() {
            sorter.step().unwrap();
            // Insertion sort holds one element outside the buffer between
            // lift and place; every other machine keeps all of them inside
            if alg != Algorithm::Insertion {
                prop_assert_eq!(held_values(sorter.as_ref()), expected.clone());
            }
        }
        prop_assert_eq!(held_values(sorter.as_ref()), expected);
    }

    #[test]
    fn prop_sorting_sorted_output_changes_nothing(
        alg in algorithm(),
        values in prop::collection::vec(any::<i16>(), 0..60),
    ) {
        let mut sorted = values;
        sorted.sort();

        let mut sorter = alg.build(InstrumentedBuffer::from(sorted.clone()));
        while !sorter.is_done() {
            sorter.step().unwrap();
        }
        prop_assert_eq!(sorter.buffer().values(), sorted);
    }

    #[test]
    fn prop_cancel_keeps_permutation(
        alg in algorithm(),
        values in prop::collection::vec(any::<i16>(), 2..50),
        cut in 0usize..300,
    ) {
        let mut expected = values.clone();
        expected.sort();

        let mut sorter = alg.build(InstrumentedBuffer::from(values));
        for _ in 0..cut {
            sorter.step().unwrap();
        }
        sorter.cancel();
        let mut held = sorter.buffer().values();
        held.sort_unstable();
        prop_assert_eq!(held, expected);
        prop_assert!(sorter.is_done() || sorter.is_cancelled());
    }
}
