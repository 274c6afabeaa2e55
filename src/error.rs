//! Error taxonomy for the report pipeline
//!
//! Stream and timeout failures abort aggregation and discard partial
//! counters. Render failures abort an in-flight export; bytes already
//! flushed stay sent.

use std::time::Duration;
use thiserror::Error;

/// Failure of the underlying record source
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record on line {line} has no timestamp")]
    MissingTimestamp { line: usize },

    #[error("Record source failed: {0}")]
    Source(String),
}

/// Failure while writing a report or export
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("CSV row has {found} fields, header declares {expected}")]
    ColumnCount { expected: usize, found: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error surfaced to the caller of a report request
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Record stream failed: {0}")]
    Stream(#[from] StreamError),

    #[error("Report deadline of {after:?} elapsed before the stream was exhausted")]
    Timeout { after: Duration },

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid report request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
