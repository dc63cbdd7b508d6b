//! Trace collection and session lifecycle
//!
//! [`TraceCollector`] owns the output sink and the per-session event counter.
//! It is constructed explicitly and shared by reference with every timer, so
//! tests and embedders control its lifetime; there is no process-wide
//! singleton.
//!
//! A session is one output document: `begin_session` writes the header
//! framing, each recorded measurement appends one comma-joined event object,
//! and `end_session` writes the footer. At most one session is open per
//! collector at a time.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use log::{info, warn};

use crate::domain::{Measurement, TraceError};
use crate::export::chrome_trace::ChromeTraceEvent;
use crate::export::{TRACE_FOOTER, TRACE_HEADER};

/// Output path used by [`TraceCollector::begin_session`].
pub const DEFAULT_TRACE_PATH: &str = "Results.json";

/// State held while a session is open.
#[derive(Debug)]
struct Session {
    name: String,
    sink: File,
    event_count: u64,
}

impl Session {
    /// Append one event, comma-separated from its predecessor, and flush.
    ///
    /// Flushing per event keeps a partial trace readable if the process dies
    /// before `end_session`.
    fn write_event(&mut self, measurement: &Measurement<'_>) -> Result<(), TraceError> {
        if self.event_count > 0 {
            self.sink.write_all(b",")?;
        }
        self.event_count += 1;
        serde_json::to_writer(&mut self.sink, &ChromeTraceEvent::from_measurement(measurement))?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Collects completed measurements and streams them to a trace file.
///
/// All shared state (the sink and the event counter) lives behind one mutex:
/// the separator decision, counter increment, event write, and flush happen
/// in a single locked region, so concurrent recorders interleave whole
/// events, ordered by completion.
#[derive(Debug)]
pub struct TraceCollector {
    /// Zero point for every timestamp this collector hands out.
    epoch: Instant,
    session: Mutex<Option<Session>>,
}

impl TraceCollector {
    /// Create a collector with no open session.
    ///
    /// The collector's timestamp epoch is fixed here, so timers created
    /// before a session opens still measure on the same scale.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            session: Mutex::new(None),
        }
    }

    /// Begin a session writing to [`DEFAULT_TRACE_PATH`].
    ///
    /// # Errors
    ///
    /// See [`begin_session_at`](Self::begin_session_at).
    pub fn begin_session(&self, name: &str) -> Result<(), TraceError> {
        self.begin_session_at(name, DEFAULT_TRACE_PATH)
    }

    /// Begin a session writing to `path`, truncating any existing file.
    ///
    /// Writes the trace document header immediately; the file is valid JSON
    /// from the first recorded event onward once the footer lands.
    ///
    /// # Errors
    ///
    /// - [`TraceError::SessionAlreadyOpen`] if a session is open on this
    ///   collector; the open session and its stream are left untouched.
    /// - [`TraceError::SinkCreateFailed`] if the file cannot be created.
    /// - [`TraceError::Io`] if writing the header fails.
    pub fn begin_session_at(&self, name: &str, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let path = path.as_ref();
        let mut guard = self.lock_session();
        if let Some(open) = guard.as_ref() {
            return Err(TraceError::SessionAlreadyOpen(open.name.clone()));
        }

        let mut sink = File::create(path).map_err(|source| TraceError::SinkCreateFailed {
            path: path.to_path_buf(),
            source,
        })?;
        sink.write_all(TRACE_HEADER.as_bytes())?;
        sink.flush()?;

        info!("trace session \"{name}\" started, writing to {}", path.display());
        *guard = Some(Session {
            name: name.to_string(),
            sink,
            event_count: 0,
        });
        Ok(())
    }

    /// End the open session: write the footer, flush, and close the file.
    ///
    /// # Errors
    ///
    /// - [`TraceError::NoOpenSession`] if no session is open.
    /// - [`TraceError::Io`] if writing the footer fails; the session is
    ///   closed regardless.
    pub fn end_session(&self) -> Result<(), TraceError> {
        let mut session = self
            .lock_session()
            .take()
            .ok_or(TraceError::NoOpenSession)?;

        // Sink is closed when `session` drops, even if the footer write fails.
        session.sink.write_all(TRACE_FOOTER.as_bytes())?;
        session.sink.flush()?;
        info!(
            "trace session \"{}\" ended after {} event(s)",
            session.name, session.event_count
        );
        Ok(())
    }

    /// Record one completed measurement into the open session.
    ///
    /// Recording is deliberately infallible from the caller's point of view:
    /// timers submit from `Drop`, where there is no one to hand an error to,
    /// and instrumentation must never take the host program down. A
    /// measurement that cannot be written (no open session, or a sink
    /// failure) is dropped with a warning; the worst outcome is a missing or
    /// truncated trace file.
    pub fn record(&self, measurement: &Measurement<'_>) {
        let mut guard = self.lock_session();
        let Some(session) = guard.as_mut() else {
            warn!(
                "dropping measurement \"{}\": no open trace session",
                measurement.name
            );
            return;
        };
        if let Err(e) = session.write_event(measurement) {
            warn!("failed to write trace event \"{}\": {e}", measurement.name);
        }
    }

    /// Whether a session is currently open on this collector.
    #[must_use]
    pub fn is_session_open(&self) -> bool {
        self.lock_session().is_some()
    }

    /// Number of events written in the open session, or 0 with none open.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.lock_session().as_ref().map_or(0, |s| s.event_count)
    }

    /// Microseconds elapsed since this collector's epoch.
    ///
    /// Monotonic: later calls never return a smaller value.
    #[must_use]
    pub fn timestamp_us(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// A panicked recorder cannot leave the session state inconsistent (each
    /// event is written whole under the lock), so poisoning is ignored.
    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TraceCollector {
    fn default() -> Self {
        Self::new()
    }
}
