// crates/corder-scheduler/src/lib.rs

//! Partitioned, multi-threaded constructive-ordering search.
//!
//! - [`PartitionPlan`]: contiguous rank ranges, one per worker, under the
//!   halved or exhaustive [`RangePolicy`].
//! - [`run_worker`]: unrank the range's seed, then verify and advance until
//!   the quota is spent.
//! - [`search`]: spawn one scoped thread per partition, join them all, and
//!   sum the returned counts (doubling under the halved policy).
//!
//! ```rust
//! use corder_core::GroupSize;
//! use corder_scheduler::{search, RangePolicy, SearchConfig};
//!
//! let cfg = SearchConfig::with_workers(GroupSize::new(6)?, 2, RangePolicy::Halved)?;
//! let report = search(&cfg, None)?;
//! assert_eq!(report.total, 4);
//! # Ok::<(), anyhow::Error>(())
//! ```

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
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

/// Thread dispatch and aggregation.
pub mod coordinator;
/// Boundary errors.
pub mod error;
/// Rank-range partitioning.
pub mod plan;
/// Recorded-ordering destinations.
pub mod sink;
/// Per-worker verification loop.
pub mod worker;

pub use coordinator::{search, SearchConfig, SearchReport};
pub use error::SearchError;
pub use plan::{Partition, PartitionPlan, RangePolicy};
pub use sink::{CollectSink, OrderingSink, WriterSink};
pub use worker::{run_worker, run_worker_until, RangeCursor, WorkerResult, STOP_POLL_INTERVAL};
