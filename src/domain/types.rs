//! Domain types providing compile-time safety and self-documentation
//!
//! These newtype wrappers keep distinct integer concepts (thread identity,
//! microsecond offsets) from being mixed up in function signatures.

use std::fmt;

/// Executor identity
///
/// A 32-bit stand-in for "which thread ran this region", derived by hashing
/// the OS thread's unique ID. Advisory only: the visualizer uses it to group
/// events into lanes, so hash collisions are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutorId(pub u32);

impl fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Executor#{}", self.0)
    }
}

/// A completed timing of one labeled code region
///
/// Produced exactly once per [`ScopedTimer`](crate::ScopedTimer), consumed by
/// [`TraceCollector::record`](crate::TraceCollector::record), and discarded.
/// The label is borrowed from the caller and never retained past the write.
///
/// Timestamps are integer microseconds since the owning collector's epoch:
/// consistent within one run, not comparable across runs or machines.
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    /// Caller-supplied region label
    pub name: &'a str,
    /// Region start, microseconds since the collector epoch
    pub start_us: u64,
    /// Region end, microseconds since the collector epoch
    pub end_us: u64,
    /// Identity of the thread that ran the region
    pub executor: ExecutorId,
}

impl Measurement<'_> {
    /// Elapsed time of the region in microseconds
    ///
    /// Saturating: a measurement can never report a negative duration even
    /// if its timestamps were constructed out of order by hand.
    #[must_use]
    pub fn duration_us(&self) -> u64 {
        self.end_us.saturating_sub(self.start_us)
    }
}
