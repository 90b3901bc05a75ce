//! Parsing and normalization of ns-3 simulation traces for plotting.
//!
//! The simulation scenarios write node positions, RSSI-vs-distance traces per
//! wall material, RSSI-vs-time traces and SANET performance CSVs. This crate
//! reads those files into typed tables, extracts per-node series and groups
//! them into tagged comparisons for a plotting front end.
//!
//! ## Module Organization
//!
//! - `trace`: timestamp normalization, readers, node extraction, comparisons
//! - `config`: TOML configuration naming the trace files
//! - `pipeline`: one entry point per figure

pub mod config;
pub mod pipeline;
pub mod trace;

pub use config::TraceConfig;
pub use pipeline::{Figure, FigureData, Pipeline};
