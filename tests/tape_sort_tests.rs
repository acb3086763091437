mod common;
use common::{FaultyStore, input_tape, parse_tape, sort_text, sort_values, sorted_copy};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tape_sort::fixtures::{random_elements, shuffled_sequence};
use tape_sort::{MergeStrategy, TapeSortError, TapeSorter};

#[test]
fn test_small_worked_example() {
    let (output, stats) = sort_text(500, "3 \n 5 1 3", MergeStrategy::LinearScan).unwrap();
    assert_eq!(output, vec![1, 3, 5]);
    assert!(stats.run_gen_stats.num_runs <= 2);
}

#[test]
fn test_negative_and_mixed_sign_values() {
    let output = sort_values(1024, &[-5, 64, 0, -100, 12, 7, -42]).unwrap();
    assert_eq!(output, vec![-100, -42, -5, 0, 7, 12, 64]);
}

#[test]
fn test_extreme_values() {
    let values = [i32::MAX, 0, i32::MIN, -1, i32::MAX, i32::MIN];
    let output = sort_values(12, &values).unwrap();
    assert_eq!(output, sorted_copy(&values));
}

#[test]
fn test_permutation_and_order_across_many_runs() {
    let mut rng = StdRng::seed_from_u64(42);
    for (memory, n) in [(40, 100), (64, 256), (400, 10_000), (1 << 20, 10_000)] {
        let values = shuffled_sequence(n, &mut rng);
        let output = sort_values(memory, &values).unwrap();
        assert_eq!(output, sorted_copy(&values), "memory={memory} n={n}");
    }
}

#[test]
fn test_duplicates_preserved() {
    let mut rng = StdRng::seed_from_u64(3);
    let values = random_elements(2_000, -10..=10, &mut rng);
    let output = sort_values(400, &values).unwrap();
    assert_eq!(output.len(), 2_000);
    assert_eq!(output, sorted_copy(&values));
}

#[test]
fn test_already_sorted_input_is_unchanged() {
    let values: Vec<i32> = (-50..50).collect();
    let output = sort_values(40, &values).unwrap();
    assert_eq!(output, values);
}

#[test]
fn test_strategies_agree() {
    let mut rng = StdRng::seed_from_u64(99);
    let values = random_elements(3_000, -100..=100, &mut rng);
    let tape = input_tape(&values);
    let (linear, linear_stats) = sort_text(256, &tape, MergeStrategy::LinearScan).unwrap();
    let (tree, tree_stats) = sort_text(256, &tape, MergeStrategy::LoserTree).unwrap();
    assert_eq!(linear, tree);
    assert_eq!(linear_stats.tape.reads, tree_stats.tape.reads);
    assert_eq!(tree_stats.merge_stats.strategy, MergeStrategy::LoserTree);
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(5);
    let values = random_elements(1_000, 0..=3, &mut rng);
    let tape = input_tape(&values);
    let first = sort_text(200, &tape, MergeStrategy::LoserTree).unwrap().0;
    for _ in 0..3 {
        assert_eq!(sort_text(200, &tape, MergeStrategy::LoserTree).unwrap().0, first);
    }
}

#[test]
fn test_one_rewind_per_run() {
    let values: Vec<i32> = (0..90).rev().collect();
    let (_, stats) = sort_text(40, &input_tape(&values), MergeStrategy::LinearScan).unwrap();
    assert_eq!(stats.budget.run_count, 9);
    assert_eq!(stats.tape.rewinds, 9);
    // Count token, then each element read once from input and once from its run.
    assert_eq!(stats.tape.reads, 1 + 90 + 90);
    assert_eq!(stats.tape.writes, 90 + 90);
    assert_eq!(stats.tape.shifts, stats.tape.reads + stats.tape.writes);
}

#[test]
fn test_trailing_tokens_ignored() {
    let (output, _) = sort_text(64, "2\n9 8 7 6", MergeStrategy::LinearScan).unwrap();
    assert_eq!(output, vec![8, 9]);
}

#[test]
fn test_empty_input() {
    for input in ["", "   \n\t"] {
        let err = sort_text(1024, input, MergeStrategy::LinearScan).unwrap_err();
        assert!(
            matches!(err, TapeSortError::UnexpectedEndOfInput(_)),
            "input {input:?}: {err}"
        );
    }
}

#[test]
fn test_fewer_values_than_declared() {
    let err = sort_text(1024, "5\n1 2 3", MergeStrategy::LinearScan).unwrap_err();
    assert!(matches!(err, TapeSortError::UnexpectedEndOfInput(_)));
    assert!(err.to_string().contains("declares 5"));
}

#[test]
fn test_huge_declared_count_fails_without_reserving_it() {
    let err =
        sort_text(u64::MAX, "3000000000000000000 1 2", MergeStrategy::LinearScan).unwrap_err();
    assert!(matches!(err, TapeSortError::UnexpectedEndOfInput(_)));
    assert!(err.to_string().contains("declares 3000000000000000000"));
}

#[test]
fn test_memory_insufficient() {
    let values: Vec<i32> = (0..16).collect();
    let err = sort_values(15, &values).unwrap_err();
    assert!(matches!(
        err,
        TapeSortError::MemoryInsufficient {
            max_memory_size: 15,
            number_of_elements: 16
        }
    ));

    let err = sort_values(3, &[1]).unwrap_err();
    assert!(matches!(err, TapeSortError::MemoryInsufficient { .. }));
}

#[test]
fn test_malformed_element() {
    let err = sort_text(1024, "3\n1 two 3", MergeStrategy::LinearScan).unwrap_err();
    assert!(matches!(err, TapeSortError::MalformedElement { position: 2, .. }));
}

#[test]
fn test_failed_open_releases_everything() {
    let values: Vec<i32> = (0..30).rev().collect();
    let mut store = FaultyStore::new();
    store.fail_open = Some(2);
    let mut output = Vec::new();

    let err = TapeSorter::default()
        .sort(40, input_tape(&values).as_bytes(), &mut output, &mut store)
        .unwrap_err();

    assert!(matches!(err, TapeSortError::ResourceUnavailable { .. }));
    assert_eq!(store.live_sources.get(), 0, "opened runs must be closed");
    assert!(store.inner.is_empty(), "runs must be released");
    let mut released = store.released.clone();
    released.sort_unstable();
    assert_eq!(released, vec![0, 1, 2]);
}

#[test]
fn test_failed_create_releases_earlier_runs() {
    let values: Vec<i32> = (0..30).collect();
    let mut store = FaultyStore::new();
    store.fail_create = Some(1);
    let mut output = Vec::new();

    let err = TapeSorter::default()
        .sort(40, input_tape(&values).as_bytes(), &mut output, &mut store)
        .unwrap_err();

    assert!(matches!(err, TapeSortError::ResourceUnavailable { .. }));
    assert!(store.inner.is_empty());
    assert_eq!(store.released, vec![0]);
}

#[test]
fn test_empty_run_is_unexpected_end() {
    let values: Vec<i32> = (0..12).collect();
    let mut store = FaultyStore::new();
    store.empty_run = Some(1);
    let mut output = Vec::new();

    let err = TapeSorter::default()
        .sort(16, input_tape(&values).as_bytes(), &mut output, &mut store)
        .unwrap_err();

    assert!(matches!(err, TapeSortError::UnexpectedEndOfInput(_)));
    assert_eq!(store.live_sources.get(), 0);
    assert!(store.inner.is_empty());
}

#[test]
fn test_successful_sort_closes_all_sources() {
    let values: Vec<i32> = (0..25).rev().collect();
    let mut store = FaultyStore::new();
    let mut output = Vec::new();

    TapeSorter::default()
        .sort(20, input_tape(&values).as_bytes(), &mut output, &mut store)
        .unwrap();

    assert_eq!(store.live_sources.get(), 0);
    assert!(store.inner.is_empty());
    assert_eq!(store.released.len(), 5);
    assert_eq!(
        parse_tape(&String::from_utf8(output).unwrap()),
        (0..25).collect::<Vec<_>>()
    );
}
