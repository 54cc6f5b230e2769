// crates/corder-scheduler/src/worker.rs

//! One worker's verification loop over its own rank range.

use crate::{OrderingSink, Partition};
use corder_core::{advance, unrank, Element, GroupSize, Rank, Verifier};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::debug;

/// Walks the orderings of one partition in rank order.
///
/// The seed is unranked once; every following ordering comes from
/// [`advance`]. Exactly `len` orderings are yielded, so the successor's
/// exhaustion signal never matters for a well-formed partition.
#[derive(Clone, Debug)]
pub struct RangeCursor {
    current: Vec<Element>,
    remaining: Rank,
    started: bool,
}

impl RangeCursor {
    /// Position a cursor at the start of `part`.
    ///
    /// Empty partitions never unrank, so their start may equal `(n-1)!`.
    ///
    /// # Panics
    /// Panics if `part` is non-empty and starts outside the search space.
    #[must_use]
    pub fn new(group: GroupSize, part: Partition) -> Self {
        let current = if part.is_empty() {
            Vec::new()
        } else {
            unrank(group.get() - 1, part.start)
        };
        Self {
            current,
            remaining: part.len,
            started: false,
        }
    }

    /// The next ordering in the range, or `None` once the quota is spent.
    pub fn next_ordering(&mut self) -> Option<&[Element]> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            advance(&mut self.current);
        } else {
            self.started = true;
        }
        self.remaining -= 1;
        Some(&self.current)
    }
}

/// Outcome of one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerResult {
    /// Worker index.
    pub worker: usize,
    /// First rank of the worker's range.
    pub start: Rank,
    /// Orderings verified (equals the partition length).
    pub checked: u64,
    /// Constructive orderings found in the range.
    pub found: u64,
}

/// Orderings verified between two looks at the stop flag.
pub const STOP_POLL_INTERVAL: u64 = 4096;

/// Verify every ordering of `part`, recording matches to `sink` if given.
#[must_use]
pub fn run_worker(
    group: GroupSize,
    part: Partition,
    sink: Option<&dyn OrderingSink>,
) -> WorkerResult {
    run_worker_until(group, part, sink, &AtomicBool::new(false))
}

/// Raises the stop flag if the worker unwinds.
struct RaiseOnPanic<'a>(&'a AtomicBool);

impl Drop for RaiseOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::Relaxed);
        }
    }
}

/// Like [`run_worker`], but gives up the rest of the quota once `stop` is
/// raised. The flag is polled every [`STOP_POLL_INTERVAL`] orderings, and
/// raised here if this worker panics.
#[must_use]
pub fn run_worker_until(
    group: GroupSize,
    part: Partition,
    sink: Option<&dyn OrderingSink>,
    stop: &AtomicBool,
) -> WorkerResult {
    let _guard = RaiseOnPanic(stop);
    let t0 = Instant::now();
    debug!(worker = part.worker, start = part.start, len = part.len, "worker started");

    let mut verifier = Verifier::new(group);
    let mut cursor = RangeCursor::new(group, part);
    let mut checked = 0u64;
    let mut found = 0u64;

    loop {
        if checked % STOP_POLL_INTERVAL == 0 && stop.load(Ordering::Relaxed) {
            debug!(worker = part.worker, checked, "worker stopped early");
            break;
        }
        let Some(ord) = cursor.next_ordering() else {
            break;
        };
        checked += 1;
        if verifier.check(ord) {
            found += 1;
            if let Some(s) = sink {
                s.record(part.worker, ord);
            }
        }
    }

    debug!(
        worker = part.worker,
        checked,
        found,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "worker finished"
    );
    WorkerResult {
        worker: part.worker,
        start: part.start,
        checked,
        found,
    }
}
