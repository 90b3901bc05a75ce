//! Trace parsing and normalization.
//!
//! Provides:
//! - Timestamp normalization for simulator time tokens
//! - Readers for mobility, RSSI-distance, RSSI-time and SANET metric traces
//! - Per-node extraction and tagged comparisons for plotting
//!
//! Every reader call returns a fresh, read-only `TraceTable`; nothing is
//! cached or shared between calls.

pub mod compare;
pub mod error;
pub mod extract;
pub mod reader;
pub mod timestamp;
pub mod types;

pub use compare::{Comparison, metric_series, node_series};
pub use error::TraceError;
pub use extract::{extract_node, node_subsets};
pub use reader::{
    SanetLayout, TraceFormat, parse_trace, read_mobility, read_rssi_distance, read_rssi_time, read_sanet, read_trace,
};
pub use timestamp::{TimeUnit, nanos_to_seconds, normalize_timestamp};
pub use types::{Field, FieldKind, Material, Record, Schema, SeriesTag, TraceTable, Value};
