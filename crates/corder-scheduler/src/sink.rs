//! Destinations for recorded orderings.
//!
//! Workers call [`OrderingSink::record`] for every match when recording is
//! enabled. Implementations serialize concurrent calls so one ordering's
//! text is never interleaved with another's.

use corder_core::{format_ordering, Element};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives constructive orderings from workers.
pub trait OrderingSink: Sync {
    /// Record one constructive ordering found by `worker`.
    fn record(&self, worker: usize, ordering: &[Element]);

    /// Flush and report the first failure seen by [`Self::record`], if any.
    ///
    /// Called once by the coordinator after every worker has joined.
    fn finish(&self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct WriterState<W> {
    out: W,
    error: Option<io::Error>,
}

/// Writes one comma-separated ordering per line to a shared writer.
///
/// The first I/O error is latched; later records are dropped and the error
/// is returned from [`OrderingSink::finish`].
#[derive(Debug)]
pub struct WriterSink<W> {
    state: Mutex<WriterState<W>>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer (e.g. `io::stderr()` or a `BufWriter<File>`).
    pub const fn new(out: W) -> Self {
        Self {
            state: Mutex::new(WriterState { out, error: None }),
        }
    }

    /// Recover the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .out
    }

    fn lock(&self) -> MutexGuard<'_, WriterState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> OrderingSink for WriterSink<W> {
    fn record(&self, _worker: usize, ordering: &[Element]) {
        let line = format_ordering(ordering);
        let mut st = self.lock();
        if st.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(st.out, "{line}") {
            st.error = Some(e);
        }
    }

    fn finish(&self) -> io::Result<()> {
        let mut st = self.lock();
        if let Some(e) = st.error.take() {
            return Err(e);
        }
        st.out.flush()
    }
}

/// Keeps recorded orderings in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    found: Mutex<Vec<(usize, Vec<Element>)>>,
}

impl CollectSink {
    /// Empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orderings recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.found.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded orderings in lexicographic order, without worker ids.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Vec<Element>> {
        let mut v: Vec<_> = self
            .found
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .map(|(_, o)| o)
            .collect();
        v.sort_unstable();
        v
    }

    /// Recorded `(worker, ordering)` pairs in arrival order.
    #[must_use]
    pub fn into_records(self) -> Vec<(usize, Vec<Element>)> {
        self.found.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrderingSink for CollectSink {
    fn record(&self, worker: usize, ordering: &[Element]) {
        self.found
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((worker, ordering.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_emits_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.record(0, &[1, 2, 3]);
        sink.record(3, &[3, 2, 1]);
        sink.finish().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "1,2,3\n3,2,1\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_latches_first_error() {
        let sink = WriterSink::new(Broken);
        sink.record(0, &[1]);
        sink.record(0, &[1]);
        let err = sink.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        // Latched error was consumed.
        assert!(sink.finish().is_ok());
    }

    #[test]
    fn collect_sink_sorts() {
        let sink = CollectSink::new();
        assert!(sink.is_empty());
        sink.record(1, &[3, 2, 1]);
        sink.record(0, &[1, 2, 3]);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.into_sorted(), vec![vec![1, 2, 3], vec![3, 2, 1]]);
    }
}
