//! One entry point per figure: read the traces a figure needs and shape them
//! into the tables or tagged series the plotting side consumes.
//!
//! A failing figure returns its error; callers skip that figure and carry on
//! with the others rather than plotting placeholder data.

use crate::config::TraceConfig;
use crate::trace::{
    Comparison, TraceError, TraceFormat, TraceTable, extract_node, metric_series, node_series, read_mobility,
    read_rssi_distance, read_rssi_time, read_trace,
};

/// Figures the pipeline can prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
    SpatialDistribution,
    RssiVsDistance,
    RssiVsTime,
    SanetMetrics,
}

impl Figure {
    pub const ALL: [Figure; 4] = [
        Figure::SpatialDistribution,
        Figure::RssiVsDistance,
        Figure::RssiVsTime,
        Figure::SanetMetrics,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Figure::SpatialDistribution => "Spatial Distribution",
            Figure::RssiVsDistance => "RSSI of received node measured against distance",
            Figure::RssiVsTime => "RSSI vs Time",
            Figure::SanetMetrics => "SANET metrics over time",
        }
    }
}

/// Prepared data for one figure.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureData {
    Single(TraceTable),
    Series(Comparison),
}

impl FigureData {
    /// Number of series the figure will draw.
    pub fn series_count(&self) -> usize {
        match self {
            FigureData::Single(_) => 1,
            FigureData::Series(c) => c.len(),
        }
    }

    /// Total rows across all series.
    pub fn row_count(&self) -> usize {
        match self {
            FigureData::Single(t) => t.len(),
            FigureData::Series(c) => c.series().iter().map(|(_, t)| t.len()).sum(),
        }
    }
}

/// Builds figure data from the traces named in a `TraceConfig`.
pub struct Pipeline {
    config: TraceConfig,
}

impl Pipeline {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn prepare(&self, figure: Figure) -> Result<FigureData, TraceError> {
        match figure {
            Figure::SpatialDistribution => self.spatial_distribution().map(FigureData::Series),
            Figure::RssiVsDistance => self.rssi_vs_distance().map(FigureData::Series),
            Figure::RssiVsTime => self.rssi_vs_time().map(FigureData::Single),
            Figure::SanetMetrics => self.sanet_metrics().map(FigureData::Series),
        }
    }

    /// Node trajectories for ids `0..node_count`, tagged `node <id>`.
    pub fn spatial_distribution(&self) -> Result<Comparison, TraceError> {
        let table = read_mobility(self.config.mobility_path())?;
        node_series(&table, self.config.node_count)
    }

    /// The comparison node's RSSI-distance rows from each configured material.
    pub fn rssi_vs_distance(&self) -> Result<Comparison, TraceError> {
        let node = self.config.compare_node;
        let series = self
            .config
            .materials
            .iter()
            .map(|&material| -> Result<_, TraceError> {
                let table = read_rssi_distance(self.config.rssi_distance_path(material), material)?;
                let subset = extract_node(&table, node)?;
                if subset.is_empty() {
                    log::warn!("Node {} has no rows in the {} trace", node, material.label());
                }
                Ok((material, subset))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Comparison::side_by_side(series)
    }

    /// RSSI against time, with times normalized to nanoseconds.
    pub fn rssi_vs_time(&self) -> Result<TraceTable, TraceError> {
        read_rssi_time(self.config.rssi_time_path())
    }

    /// Each configured SANET metric against simulation time.
    pub fn sanet_metrics(&self) -> Result<Comparison, TraceError> {
        let layout = self.config.sanet_layout();
        let table = read_trace(self.config.sanet_path(), &TraceFormat::SanetMetrics(layout.clone()))?;
        let metrics: Vec<&str> = self.config.sanet.metrics.iter().map(String::as_str).collect();
        metric_series(&table, &layout.time_column, &metrics)
    }
}
