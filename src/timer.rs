//! Scoped region timing
//!
//! A [`ScopedTimer`] measures the lifetime of one labeled code region and
//! submits exactly one [`Measurement`] to its collector, on explicit
//! [`stop`](ScopedTimer::stop) or at scope exit. Binding the measurement to
//! scope lifetime means early returns and unwinding are measured without any
//! teardown call at the instrumentation site.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::thread;

use crate::collector::TraceCollector;
use crate::domain::{ExecutorId, Measurement};

/// RAII timer for one labeled code region.
///
/// The label is borrowed and must outlive the timer; with string literals
/// (the common case) that is automatic.
///
/// ```no_run
/// # use trace_scope::{ScopedTimer, TraceCollector};
/// # fn process(collector: &TraceCollector) {
/// let _timer = ScopedTimer::new(collector, "process_batch");
/// // ... work, early returns included ...
/// # }
/// ```
#[derive(Debug)]
pub struct ScopedTimer<'a> {
    collector: &'a TraceCollector,
    label: &'a str,
    start_us: u64,
    stopped: bool,
}

impl<'a> ScopedTimer<'a> {
    /// Start timing: captures the current collector timestamp as the start
    /// point of the region.
    #[must_use]
    pub fn new(collector: &'a TraceCollector, label: &'a str) -> Self {
        Self {
            collector,
            label,
            start_us: collector.timestamp_us(),
            stopped: false,
        }
    }

    /// Stop the timer early and submit its measurement now.
    ///
    /// Consumes the timer, so a region can be stopped at most once; the
    /// drop at the end of this call sees the stopped flag and does nothing.
    pub fn stop(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let end_us = self.collector.timestamp_us();
        self.collector.record(&Measurement {
            name: self.label,
            start_us: self.start_us,
            end_us,
            executor: current_executor_id(),
        });
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Stable advisory identity for the calling thread.
///
/// [`thread::ThreadId`] exposes no integer, so the id is hashed down to 32
/// bits and cached per thread. Collisions merely merge two lanes in the
/// visualizer.
fn current_executor_id() -> ExecutorId {
    thread_local! {
        static EXECUTOR_ID: ExecutorId = hash_current_thread();
    }
    EXECUTOR_ID.with(|id| *id)
}

#[allow(clippy::cast_possible_truncation)]
fn hash_current_thread() -> ExecutorId {
    let mut hasher = DefaultHasher::new();
    thread::current().id().hash(&mut hasher);
    ExecutorId(hasher.finish() as u32)
}
