//! Dispatch one worker thread per partition and aggregate their counts.
//!
//! Workers never communicate while running. Each one returns its local count
//! through `join`, and the coordinator sums after the join barrier, so no lock
//! guards the total. The only shared state during the run is the optional
//! [`OrderingSink`] and a stop flag, raised when a spawn fails or a worker
//! panics so the others give up their remaining quota.

use crate::{run_worker_until, OrderingSink, PartitionPlan, RangePolicy, SearchError, WorkerResult};
use corder_core::{GroupSize, Rank};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info, warn};

/// Validated search parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    group: GroupSize,
    parallelism: usize,
    multiplier: usize,
    policy: RangePolicy,
}

impl SearchConfig {
    /// Derive the worker count as `parallelism × multiplier`.
    ///
    /// `parallelism` is injected (normally the host's available parallelism)
    /// so the search can be driven deterministically in tests.
    ///
    /// # Errors
    /// - [`SearchError::NoWorkers`] if the product is zero.
    /// - [`SearchError::TooFewElements`] if `n < parallelism`.
    pub fn new(
        group: GroupSize,
        parallelism: usize,
        multiplier: usize,
        policy: RangePolicy,
    ) -> Result<Self, SearchError> {
        let workers = parallelism.saturating_mul(multiplier);
        if workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        if (group.get() as usize) < parallelism {
            return Err(SearchError::TooFewElements {
                n: group.get(),
                parallelism,
            });
        }
        Ok(Self {
            group,
            parallelism,
            multiplier,
            policy,
        })
    }

    /// Exactly `workers` workers (parallelism = `workers`, multiplier = 1).
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn with_workers(
        group: GroupSize,
        workers: usize,
        policy: RangePolicy,
    ) -> Result<Self, SearchError> {
        Self::new(group, workers, 1, policy)
    }

    /// Group searched.
    #[must_use]
    pub const fn group(&self) -> GroupSize {
        self.group
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.parallelism * self.multiplier
    }

    /// Thread multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> usize {
        self.multiplier
    }

    /// Range policy.
    #[must_use]
    pub const fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Lay out the partitions for this configuration.
    ///
    /// # Errors
    /// [`SearchError::DegeneratePartition`] if a worker's range would be empty.
    pub fn plan(&self) -> Result<PartitionPlan, SearchError> {
        PartitionPlan::new(self.group, self.workers(), self.policy)
    }
}

/// Aggregated outcome of a search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Group size `n`.
    pub group_size: GroupSize,
    /// Number of workers dispatched.
    pub workers: usize,
    /// Range policy used.
    pub policy: RangePolicy,
    /// Size of the full search space, `(n-1)!`.
    pub search_space: Rank,
    /// Unclamped per-worker range length.
    pub chunk: Rank,
    /// Orderings verified across all workers.
    pub checked: u64,
    /// Constructive orderings found inside the visited ranges.
    pub found_in_range: u64,
    /// Final count (`found_in_range` doubled under the halved policy).
    pub total: u64,
    /// Per-worker results in worker order.
    pub per_worker: Vec<WorkerResult>,
}

/// Run the search described by `config`.
///
/// When `sink` is given, every constructive ordering found is recorded to it.
///
/// # Errors
/// - configuration errors from [`SearchConfig::plan`], before any thread starts;
/// - [`SearchError::Dispatch`] if a worker thread cannot be spawned (workers
///   already running are stopped and joined before returning);
/// - [`SearchError::WorkerPanicked`] for the lowest-indexed worker that
///   panicked;
/// - [`SearchError::Sink`] if recording failed.
pub fn search(
    config: &SearchConfig,
    sink: Option<&dyn OrderingSink>,
) -> Result<SearchReport, SearchError> {
    let plan = config.plan()?;
    let group = config.group();
    info!(
        n = group.get(),
        workers = config.workers(),
        chunk = plan.chunk(),
        policy = ?plan.policy(),
        "dispatching workers"
    );

    let stop = AtomicBool::new(false);
    let joined: Vec<(usize, thread::Result<WorkerResult>)> = thread::scope(|s| {
        let stop = &stop;
        let mut handles = Vec::with_capacity(plan.partitions().len());
        for &part in plan.partitions() {
            let spawned = thread::Builder::new()
                .name(format!("corder-worker-{}", part.worker))
                .spawn_scoped(s, move || run_worker_until(group, part, sink, stop));
            match spawned {
                Ok(handle) => handles.push((part.worker, handle)),
                Err(source) => {
                    stop.store(true, Ordering::Relaxed);
                    warn!(worker = part.worker, error = %source, "spawn failed, stopping workers");
                    for (_, handle) in handles {
                        let _ = handle.join();
                    }
                    return Err(SearchError::Dispatch {
                        worker: part.worker,
                        source,
                    });
                }
            }
        }
        // Join every handle before looking at results so no panic is left
        // unobserved when the scope closes.
        Ok(handles
            .into_iter()
            .map(|(worker, handle)| (worker, handle.join()))
            .collect())
    })?;

    let mut per_worker = Vec::with_capacity(joined.len());
    for (worker, outcome) in joined {
        per_worker.push(outcome.map_err(|_| SearchError::WorkerPanicked { worker })?);
    }

    if let Some(s) = sink {
        s.finish().map_err(SearchError::Sink)?;
    }

    let checked: u64 = per_worker.iter().map(|r| r.checked).sum();
    let found_in_range: u64 = per_worker.iter().map(|r| r.found).sum();
    let total = found_in_range * plan.policy().scale();
    debug!(checked, found_in_range, total, "workers joined");

    Ok(SearchReport {
        group_size: group,
        workers: config.workers(),
        policy: plan.policy(),
        search_space: plan.total(),
        chunk: plan.chunk(),
        checked,
        found_in_range,
        total,
        per_worker,
    })
}
