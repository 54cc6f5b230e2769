//! Errors raised at the search boundary (configuration and dispatch).
//!
//! Nothing inside a worker loop can fail; every variant here is detected
//! either before dispatch or after the join barrier.

use std::io;
use thiserror::Error;

/// Fatal search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The derived worker count is zero.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// `n` is smaller than the parallelism the worker count is derived from.
    #[error("n = {n} is too small; it must be at least the number of concurrent threads, {parallelism}")]
    TooFewElements {
        /// Group size.
        n: u32,
        /// Detected or injected parallelism.
        parallelism: usize,
    },

    /// The search space cannot be split across this many workers: the range
    /// per worker is empty, or the halved ranges miss part of the lower half.
    #[error("n = {n} is too small for {workers} workers: {total} orderings cannot be split evenly enough")]
    DegeneratePartition {
        /// Group size.
        n: u32,
        /// Worker count.
        workers: usize,
        /// Size of the search space, `(n-1)!`.
        total: u64,
    },

    /// A worker thread could not be started.
    #[error("error creating worker thread {worker}")]
    Dispatch {
        /// Index of the worker that failed to start.
        worker: usize,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked before returning its count.
    #[error("worker thread {worker} panicked")]
    WorkerPanicked {
        /// Index of the panicking worker.
        worker: usize,
    },

    /// Writing recorded orderings failed.
    #[error("failed to write recorded orderings")]
    Sink(#[source] io::Error),
}

impl SearchError {
    /// Whether this error was detected before any worker was started.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoWorkers | Self::TooFewElements { .. } | Self::DegeneratePartition { .. }
        )
    }
}
