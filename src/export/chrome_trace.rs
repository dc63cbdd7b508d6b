//! Chrome Trace Event format
//! Spec: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/preview
//!
//! One session is one JSON document: [`TRACE_HEADER`], then comma-joined
//! event objects, then [`TRACE_FOOTER`]. The collector owns the framing and
//! the separators; this module only knows how a single event looks.

use std::borrow::Cow;

use serde::Serialize;

use crate::domain::Measurement;

/// Opens the trace document: a metadata object plus the start of the
/// `traceEvents` array. The misspelled `ohterData` key is part of the
/// established stream framing; viewers ignore unknown top-level keys.
pub const TRACE_HEADER: &str =
    "{\"ohterData\":{\"msg\":\"This is a visual version of profiling.\"},\"traceEvents\":[";

/// Closes the `traceEvents` array and the outer object.
pub const TRACE_FOOTER: &str = "]}";

/// Category attached to every event, used by viewers for filtering/coloring.
const EVENT_CATEGORY: &str = "Process Function";

/// Phase "X" = complete event: the record carries both a start and a duration,
/// as opposed to separate "B"/"E" begin and end markers.
const PHASE_COMPLETE: &str = "X";

/// Process lane name shown by the viewer.
const PROCESS_NAME: &str = "Profiling";

/// A single Chrome trace "complete event"
///
/// Field declaration order is serialization order, matching the documents
/// this stream's consumers already parse.
#[derive(Debug, Clone, Serialize)]
pub struct ChromeTraceEvent<'a> {
    /// Category for filtering/coloring
    cat: &'static str,
    /// Duration in microseconds
    dur: u64,
    /// Event name (the region label, sanitized)
    name: Cow<'a, str>,
    /// Phase: "X" = complete
    ph: &'static str,
    /// Process lane name
    pid: &'static str,
    /// Executor identity, emitted as a bare integer
    tid: u32,
    /// Start timestamp in microseconds
    ts: u64,
}

impl<'a> ChromeTraceEvent<'a> {
    /// Build the wire representation of one completed measurement.
    #[must_use]
    pub fn from_measurement(measurement: &Measurement<'a>) -> Self {
        Self {
            cat: EVENT_CATEGORY,
            dur: measurement.duration_us(),
            name: sanitize_name(measurement.name),
            ph: PHASE_COMPLETE,
            pid: PROCESS_NAME,
            tid: measurement.executor.0,
            ts: measurement.start_us,
        }
    }
}

/// Replace every `"` in a label with `'`, one-for-one.
///
/// Keeps caller-supplied labels from terminating the embedded JSON string
/// while preserving their length. Other characters are left to the JSON
/// serializer, which escapes backslashes and control characters normally.
fn sanitize_name(name: &str) -> Cow<'_, str> {
    if name.contains('"') {
        Cow::Owned(name.replace('"', "'"))
    } else {
        Cow::Borrowed(name)
    }
}
