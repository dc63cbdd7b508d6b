//! # trace-scope - Scoped Timing Instrumentation
//!
//! trace-scope records wall-clock durations of labeled code regions and
//! streams them as Chrome Trace Event Format JSON, viewable in
//! `chrome://tracing` or <https://ui.perfetto.dev>.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                Instrumented Application              │
//! │   { let _t = ScopedTimer::new(&collector, "work"); } │
//! └───────────────────────┬──────────────────────────────┘
//!                         │ completed Measurement
//!                         ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                   TraceCollector                     │
//! │   session lifecycle · event counter · output sink    │
//! └───────────────────────┬──────────────────────────────┘
//!                         │ one JSON object per event
//!                         ▼
//!                    Results.json
//! ```
//!
//! ## Module Structure
//!
//! - [`timer`]: RAII timer bound to a code region; measures with a monotonic
//!   clock and submits a [`Measurement`] on stop or scope exit
//! - [`collector`]: owns the output sink and the in-session event counter;
//!   frames a session's events as one Chrome trace JSON document
//! - [`export`]: the wire format itself (event struct, framing, label
//!   sanitization)
//! - [`domain`]: core types ([`Measurement`], [`ExecutorId`]) and errors
//!
//! ## Usage
//!
//! ```no_run
//! use trace_scope::{ScopedTimer, TraceCollector};
//!
//! # fn main() -> Result<(), trace_scope::TraceError> {
//! let collector = TraceCollector::new();
//! collector.begin_session_at("startup", "trace.json")?;
//!
//! {
//!     let _timer = ScopedTimer::new(&collector, "load_assets");
//!     // ... work ...
//! } // measurement recorded here
//!
//! collector.end_session()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees and limits
//!
//! - Every constructed timer produces exactly one measurement, on every exit
//!   path from its scope (normal return, early return, unwinding).
//! - Recording is serialized: concurrent timers on different threads produce
//!   a valid JSON stream, ordered by completion.
//! - Recording never panics into the host program; a measurement that cannot
//!   be written is dropped with a `log` warning. The worst failure mode is a
//!   missing or truncated trace file.
//! - The collector flushes after every event, so a partial trace is readable
//!   even if the process dies before `end_session`.

pub mod collector;
pub mod domain;
pub mod export;
pub mod timer;

pub use collector::{TraceCollector, DEFAULT_TRACE_PATH};
pub use domain::{ExecutorId, Measurement, TraceError};
pub use timer::ScopedTimer;
