//! Trace export wire format
//!
//! This module defines the Chrome Trace Event Format subset emitted by the
//! collector, for visualization in chrome://tracing or Perfetto.

pub mod chrome_trace;

pub use chrome_trace::{ChromeTraceEvent, TRACE_FOOTER, TRACE_HEADER};
