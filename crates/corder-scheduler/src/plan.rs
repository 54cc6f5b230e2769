// crates/corder-scheduler/src/plan.rs

//! Split the rank space `[0, (n-1)!)` into one contiguous range per worker.
//!
//! Two policies:
//!
//! - [`RangePolicy::Halved`]: `chunk = (total / W) / 2`. Only the first half
//!   of lexicographic space is visited; every constructive ordering starting
//!   below `n/2` has exactly one mirror starting above it, so the final count
//!   is doubled. The visited prefix must reach past every ordering that
//!   starts below `n/2`, otherwise the plan is rejected.
//! - [`RangePolicy::Exhaustive`]: `chunk = total / W + 1`, clamped to
//!   `total`. Used when every matching ordering must be recorded, since a
//!   mirror is a distinct ordering.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]

use crate::SearchError;
use corder_core::{GroupSize, Rank};
use serde::{Deserialize, Serialize};

/// How much of the search space is visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Visit half the space and double the count.
    #[default]
    Halved,
    /// Visit the full space; counts are taken as-is.
    Exhaustive,
}

impl RangePolicy {
    /// Per-worker range length before clamping.
    #[inline]
    #[must_use]
    pub const fn chunk(self, total: Rank, workers: u64) -> Rank {
        match self {
            Self::Halved => (total / workers) / 2,
            Self::Exhaustive => total / workers + 1,
        }
    }

    /// Factor applied to the summed worker counts.
    #[inline]
    #[must_use]
    pub const fn scale(self) -> u64 {
        match self {
            Self::Halved => 2,
            Self::Exhaustive => 1,
        }
    }
}

/// Half-open rank range `[start, start + len)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Worker index in `[0, W)`.
    pub worker: usize,
    /// First rank to verify.
    pub start: Rank,
    /// Number of orderings to verify (the worker's quota).
    pub len: Rank,
}

impl Partition {
    /// Exclusive upper bound.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Rank {
        self.start + self.len
    }

    /// Whether the range is empty (only possible at the tail of an exhaustive plan).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `rank` falls inside this range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, rank: Rank) -> bool {
        rank >= self.start && rank < self.end()
    }
}

/// Partitions for one search, computed before any worker starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    group: GroupSize,
    policy: RangePolicy,
    total: Rank,
    chunk: Rank,
    partitions: Vec<Partition>,
}

impl PartitionPlan {
    /// Lay out `workers` ranges over the search space of `group`.
    ///
    /// # Errors
    /// - [`SearchError::NoWorkers`] if `workers == 0`.
    /// - [`SearchError::DegeneratePartition`] if the chunk size comes out as 0,
    ///   or if a halved plan stops short of the last ordering starting below `n/2`.
    pub fn new(group: GroupSize, workers: usize, policy: RangePolicy) -> Result<Self, SearchError> {
        if workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        let total = group.search_space();
        let chunk = policy.chunk(total, workers as u64);
        let short = policy == RangePolicy::Halved
            && chunk.saturating_mul(workers as u64) < lower_half_end(group);
        if chunk == 0 || short {
            return Err(SearchError::DegeneratePartition {
                n: group.get(),
                workers,
                total,
            });
        }

        let partitions = (0..workers)
            .map(|worker| {
                let start = chunk.saturating_mul(worker as u64).min(total);
                let len = chunk.min(total - start);
                Partition { worker, start, len }
            })
            .collect();

        Ok(Self {
            group,
            policy,
            total,
            chunk,
            partitions,
        })
    }

    /// Group the plan was built for.
    #[must_use]
    pub const fn group(&self) -> GroupSize {
        self.group
    }

    /// Policy the plan was built with.
    #[must_use]
    pub const fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Size of the full search space, `(n-1)!`.
    #[must_use]
    pub const fn total(&self) -> Rank {
        self.total
    }

    /// Unclamped per-worker range length.
    #[must_use]
    pub const fn chunk(&self) -> Rank {
        self.chunk
    }

    /// Ranges in worker order.
    #[must_use]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Number of ranks verified across all workers.
    #[must_use]
    pub fn covered(&self) -> Rank {
        self.partitions.iter().map(|p| p.len).sum()
    }
}

/// First rank whose ordering starts with `n/2`.
///
/// Ranks below this hold every ordering with a leading element `< n/2`. For
/// odd `n` nothing is constructive, so no bound applies.
fn lower_half_end(group: GroupSize) -> Rank {
    let n = group.get();
    if n % 2 == 1 || n <= 2 {
        return 0;
    }
    let block = group.search_space() / u64::from(n - 1);
    u64::from(n / 2 - 1) * block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(n: u32) -> GroupSize {
        GroupSize::new(n).unwrap()
    }

    #[test]
    fn halved_z4_single_worker() {
        let plan = PartitionPlan::new(g(4), 1, RangePolicy::Halved).unwrap();
        assert_eq!(plan.total(), 6);
        assert_eq!(plan.chunk(), 3);
        assert_eq!(
            plan.partitions(),
            &[Partition {
                worker: 0,
                start: 0,
                len: 3
            }]
        );
    }

    #[test]
    fn halved_ranges_are_back_to_back() {
        let plan = PartitionPlan::new(g(8), 4, RangePolicy::Halved).unwrap();
        assert_eq!(plan.chunk(), 630);
        for (i, p) in plan.partitions().iter().enumerate() {
            assert_eq!(p.worker, i);
            assert_eq!(p.start, 630 * i as u64);
            assert_eq!(p.len, 630);
        }
        assert_eq!(plan.covered(), 2520);
    }

    #[test]
    fn exhaustive_clamps_tail() {
        // total = 6, W = 4 → chunk = 2; ranges [0,2) [2,4) [4,6) [6,6)
        let plan = PartitionPlan::new(g(4), 4, RangePolicy::Exhaustive).unwrap();
        let lens: Vec<_> = plan.partitions().iter().map(|p| (p.start, p.len)).collect();
        assert_eq!(lens, vec![(0, 2), (2, 2), (4, 2), (6, 0)]);
        assert_eq!(plan.covered(), 6);
        assert!(plan.partitions()[3].is_empty());
    }

    #[test]
    fn degenerate_chunk_is_rejected() {
        let err = PartitionPlan::new(g(2), 1, RangePolicy::Halved).unwrap_err();
        assert!(matches!(err, SearchError::DegeneratePartition { n: 2, .. }));
        assert!(PartitionPlan::new(g(4), 4, RangePolicy::Halved).is_err());
        assert!(PartitionPlan::new(g(4), 0, RangePolicy::Exhaustive).is_err());
    }

    #[test]
    fn halved_prefix_must_cover_lower_block() {
        // n = 6: orderings starting with 1 or 2 occupy ranks [0, 48).
        assert_eq!(lower_half_end(g(6)), 48);
        let err = PartitionPlan::new(g(6), 41, RangePolicy::Halved).unwrap_err();
        assert!(matches!(
            err,
            SearchError::DegeneratePartition { n: 6, workers: 41, total: 120 }
        ));
        // 40 workers × chunk 1 still short; 24 workers × chunk 2 reaches 48.
        assert!(PartitionPlan::new(g(6), 40, RangePolicy::Halved).is_err());
        assert_eq!(PartitionPlan::new(g(6), 24, RangePolicy::Halved).unwrap().covered(), 48);

        // n = 8: 700 workers cover 2100 < 2160.
        assert!(PartitionPlan::new(g(8), 700, RangePolicy::Halved).is_err());
        // Exhaustive plans are unaffected.
        assert!(PartitionPlan::new(g(6), 41, RangePolicy::Exhaustive).is_ok());
    }

    #[test]
    fn partition_contains() {
        let p = Partition {
            worker: 1,
            start: 10,
            len: 5,
        };
        assert!(!p.contains(9));
        assert!(p.contains(10));
        assert!(p.contains(14));
        assert!(!p.contains(15));
        assert_eq!(p.end(), 15);
    }

    #[test]
    fn policy_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RangePolicy::Halved).unwrap(), "\"halved\"");
        assert_eq!(
            serde_json::from_str::<RangePolicy>("\"exhaustive\"").unwrap(),
            RangePolicy::Exhaustive
        );
    }
}
