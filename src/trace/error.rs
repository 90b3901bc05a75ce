//! Error taxonomy for the trace pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, normalizing, extracting or comparing traces.
///
/// None of these are retried: inputs are local static files, so a retry
/// reproduces the same failure.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file does not exist.
    #[error("trace source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Any other I/O failure while reading a trace file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O failure from a source with no associated path.
    #[error("failed to read trace source: {0}")]
    Read(#[source] std::io::Error),

    /// A row (1-based line number) has a different width than the schema.
    #[error("row {row}: expected {expected} fields, found {found}")]
    SchemaMismatch { row: usize, expected: usize, found: usize },

    /// A timestamp token failed normalization.
    #[error("malformed timestamp {token:?}: {reason}")]
    MalformedTimestamp { token: String, reason: &'static str },

    /// A numeric or node field failed coercion.
    #[error("row {row}: field {field:?} has malformed value {value:?}")]
    MalformedField { row: usize, field: String, value: String },

    /// A node id below zero was requested.
    #[error("invalid node id {0}: node ids are non-negative")]
    InvalidNodeId(i64),

    /// Node extraction on a table whose schema has no node key.
    #[error("table has no node key column")]
    MissingNodeKey,

    /// A column name not present in the schema.
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// An explicit comparison needs at least two series.
    #[error("comparison needs at least two series, found {found}")]
    InsufficientSeries { found: usize },
}

impl TraceError {
    pub(crate) fn timestamp(token: &str, reason: &'static str) -> Self {
        TraceError::MalformedTimestamp {
            token: token.to_string(),
            reason,
        }
    }
}
