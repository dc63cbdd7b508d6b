//! Structured error types for trace-scope
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Only session lifecycle operations return these; recording itself never
//! surfaces an error to the instrumented program (see
//! [`TraceCollector::record`](crate::TraceCollector::record)).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("trace session \"{0}\" is already open")]
    SessionAlreadyOpen(String),

    #[error("no trace session is open")]
    NoOpenSession,

    #[error("failed to create trace file {path}: {source}")]
    SinkCreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
