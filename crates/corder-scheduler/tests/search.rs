//! End-to-end properties of the partitioned search.
//!
//! Ground truth comes from a single-threaded sweep over the whole space with
//! the core verifier; the coordinator must agree with it for every worker
//! count and both range policies.

use corder_core::{advance, is_constructive, rank, GroupSize, Rank};
use corder_scheduler::{
    run_worker, search, CollectSink, OrderingSink, PartitionPlan, RangeCursor, RangePolicy,
    SearchConfig, SearchError,
};
use proptest::prelude::*;

#[track_caller]
fn group(n: u32) -> GroupSize {
    GroupSize::new(n).expect("valid group size")
}

fn brute_force(n: u32) -> Vec<Vec<u32>> {
    let g = group(n);
    let mut ord = g.ascending();
    let mut out = Vec::new();
    loop {
        if is_constructive(&ord, g) {
            out.push(ord.clone());
        }
        if !advance(&mut ord) {
            return out;
        }
    }
}

#[test]
fn halved_and_exhaustive_agree_with_brute_force() {
    for (n, expected) in [(4u32, 2u64), (6, 4), (8, 24)] {
        for workers in 1..=n as usize {
            let exhaustive =
                SearchConfig::with_workers(group(n), workers, RangePolicy::Exhaustive).unwrap();
            let report = search(&exhaustive, None).unwrap();
            assert_eq!(report.total, expected, "exhaustive n = {n}, W = {workers}");
            assert_eq!(report.checked, report.search_space);

            let halved =
                SearchConfig::with_workers(group(n), workers, RangePolicy::Halved).unwrap();
            match search(&halved, None) {
                Ok(report) => {
                    assert_eq!(report.total, expected, "halved n = {n}, W = {workers}");
                    assert_eq!(report.total, 2 * report.found_in_range);
                }
                // Too many workers for the halved space of a tiny group.
                Err(SearchError::DegeneratePartition { .. }) => assert!(n <= 4),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }
}

#[test]
fn exhaustive_records_every_solution_once() {
    for n in [4u32, 6, 8] {
        let cfg = SearchConfig::with_workers(group(n), 3, RangePolicy::Exhaustive).unwrap();
        let sink = CollectSink::new();
        let report = search(&cfg, Some(&sink)).unwrap();
        let recorded = sink.into_sorted();
        assert_eq!(recorded.len() as u64, report.total);
        assert_eq!(recorded, brute_force(n), "n = {n}");
    }
}

#[test]
fn halved_records_only_lower_half() {
    let n = 8u32;
    let cfg = SearchConfig::with_workers(group(n), 4, RangePolicy::Halved).unwrap();
    let sink = CollectSink::new();
    let report = search(&cfg, Some(&sink)).unwrap();
    let records = sink.into_records();
    assert_eq!(records.len() as u64, report.found_in_range);
    for (worker, ord) in &records {
        assert!(ord[0] < n / 2, "{ord:?}");
        let part = report.per_worker[*worker];
        let r = rank(ord);
        assert!(r >= part.start && r < part.start + part.checked);
    }
}

#[test]
fn z2_needs_the_exhaustive_policy() {
    let halved = SearchConfig::with_workers(group(2), 1, RangePolicy::Halved).unwrap();
    assert!(matches!(
        search(&halved, None),
        Err(SearchError::DegeneratePartition { n: 2, workers: 1, total: 1 })
    ));

    let full = SearchConfig::with_workers(group(2), 1, RangePolicy::Exhaustive).unwrap();
    assert_eq!(search(&full, None).unwrap().total, 1);
}

#[test]
fn worker_stops_on_its_last_rank() {
    let g = group(7);
    let plan = PartitionPlan::new(g, 5, RangePolicy::Halved).unwrap();
    for &part in plan.partitions() {
        let mut cursor = RangeCursor::new(g, part);
        let mut seen = 0u64;
        let mut last: Option<Rank> = None;
        while let Some(ord) = cursor.next_ordering() {
            let r = rank(ord);
            assert_eq!(r, part.start + seen);
            last = Some(r);
            seen += 1;
        }
        assert_eq!(seen, part.len);
        assert_eq!(last, Some(part.end() - 1));

        let res = run_worker(g, part, None);
        assert_eq!(res.checked, part.len);
    }
}

#[test]
fn halved_rejects_worker_counts_that_undercount() {
    // One thread × 41: chunk 1 covers ranks [0, 41), missing the solution at rank 44.
    let cfg = SearchConfig::new(group(6), 1, 41, RangePolicy::Halved).unwrap();
    assert!(matches!(
        search(&cfg, None),
        Err(SearchError::DegeneratePartition { n: 6, workers: 41, .. })
    ));
    let cfg = SearchConfig::new(group(8), 1, 700, RangePolicy::Halved).unwrap();
    assert!(matches!(search(&cfg, None), Err(SearchError::DegeneratePartition { .. })));

    // The same worker count is fine when the whole space is visited.
    let cfg = SearchConfig::new(group(6), 1, 41, RangePolicy::Exhaustive).unwrap();
    assert_eq!(search(&cfg, None).unwrap().total, 4);
}

/// Panics on every record, so every worker holding a solution panics.
struct PanickingSink;

impl OrderingSink for PanickingSink {
    fn record(&self, worker: usize, _ordering: &[u32]) {
        panic!("worker {worker} cannot record");
    }
}

#[test]
fn several_panicking_workers_report_an_error() {
    let cfg = SearchConfig::with_workers(group(8), 4, RangePolicy::Exhaustive).unwrap();
    let outcome = std::panic::catch_unwind(|| search(&cfg, Some(&PanickingSink)));
    match outcome {
        Ok(Err(SearchError::WorkerPanicked { worker })) => assert!(worker < 4),
        Ok(other) => panic!("expected WorkerPanicked, got {other:?}"),
        Err(_) => panic!("search unwound instead of returning an error"),
    }
}

#[test]
fn single_panicking_worker_is_reported() {
    let cfg = SearchConfig::with_workers(group(8), 1, RangePolicy::Exhaustive).unwrap();
    assert!(matches!(
        search(&cfg, Some(&PanickingSink)),
        Err(SearchError::WorkerPanicked { worker: 0 })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    // Halved ranges tile [0, W·chunk) with no gaps or overlaps.
    #[test]
    fn halved_partitions_tile_prefix(n in 7u32..=21, workers in 1usize..=64) {
        let plan = PartitionPlan::new(group(n), workers, RangePolicy::Halved).unwrap();
        let parts = plan.partitions();
        prop_assert_eq!(parts.len(), workers);
        let mut next: Rank = 0;
        for (i, p) in parts.iter().enumerate() {
            prop_assert_eq!(p.worker, i);
            prop_assert_eq!(p.start, next);
            prop_assert_eq!(p.len, plan.chunk());
            next = p.end();
        }
        prop_assert_eq!(next, plan.chunk() * workers as u64);
        prop_assert!(2 * next <= plan.total());
    }

    // Exhaustive ranges tile exactly [0, (n-1)!) and never run past it.
    #[test]
    fn exhaustive_partitions_tile_space(n in 2u32..=21, workers in 1usize..=64) {
        let plan = PartitionPlan::new(group(n), workers, RangePolicy::Exhaustive).unwrap();
        let mut next: Rank = 0;
        for p in plan.partitions() {
            prop_assert_eq!(p.start, next);
            prop_assert!(p.end() <= plan.total());
            next = p.end();
        }
        prop_assert_eq!(next, plan.total());
        prop_assert_eq!(plan.covered(), plan.total());
    }
}
