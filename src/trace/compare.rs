//! Group tables into tagged series for side-by-side or overlaid plots.
//!
//! No resampling or index alignment happens here: series of different
//! lengths are handed to the render side untouched.

use super::error::TraceError;
use super::extract::node_subsets;
use super::types::{SeriesTag, TraceTable};

/// Ordered collection of tagged tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    series: Vec<(SeriesTag, TraceTable)>,
}

impl Comparison {
    /// Collect series in the given order. Any count, including zero, is accepted.
    pub fn collect<T, I>(series: I) -> Self
    where
        T: Into<SeriesTag>,
        I: IntoIterator<Item = (T, TraceTable)>,
    {
        Self {
            series: series.into_iter().map(|(tag, table)| (tag.into(), table)).collect(),
        }
    }

    /// Collect series for an explicit comparison.
    ///
    /// Fails with `InsufficientSeries` if fewer than two series are given.
    pub fn side_by_side<T, I>(series: I) -> Result<Self, TraceError>
    where
        T: Into<SeriesTag>,
        I: IntoIterator<Item = (T, TraceTable)>,
    {
        let comparison = Self::collect(series);
        if comparison.len() < 2 {
            return Err(TraceError::InsufficientSeries {
                found: comparison.len(),
            });
        }
        Ok(comparison)
    }

    pub fn series(&self) -> &[(SeriesTag, TraceTable)] {
        &self.series
    }

    pub fn tags(&self) -> impl Iterator<Item = &SeriesTag> {
        self.series.iter().map(|(tag, _)| tag)
    }

    /// Table carrying `tag`, if present.
    pub fn get(&self, tag: &str) -> Option<&TraceTable> {
        self.series.iter().find(|(t, _)| t.as_str() == tag).map(|(_, table)| table)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl IntoIterator for Comparison {
    type Item = (SeriesTag, TraceTable);
    type IntoIter = std::vec::IntoIter<(SeriesTag, TraceTable)>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.into_iter()
    }
}

/// One series per node id `0..count`, tagged `node <id>`.
pub fn node_series(table: &TraceTable, count: u32) -> Result<Comparison, TraceError> {
    let subsets = node_subsets(table, count)?;
    Ok(Comparison::collect(
        subsets.into_iter().map(|(id, subset)| (SeriesTag::new(format!("node {id}")), subset)),
    ))
}

/// One series per metric, each projected to `(time_column, metric)` and tagged
/// with the metric name.
pub fn metric_series(table: &TraceTable, time_column: &str, metrics: &[&str]) -> Result<Comparison, TraceError> {
    let series = metrics
        .iter()
        .map(|metric| table.select(&[time_column, *metric]).map(|t| (SeriesTag::new(*metric), t)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Comparison::collect(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::extract::extract_node;
    use crate::trace::reader::{SanetLayout, TraceFormat, parse_trace};
    use crate::trace::types::Material;

    fn rssi(material: Material, text: &str) -> TraceTable {
        parse_trace(text.as_bytes(), &TraceFormat::RssiDistance(material)).unwrap()
    }

    #[test]
    fn test_materials_side_by_side() {
        let wood = rssi(Material::Wood, "0,0.1,-60\n1,0.1,-62\n1,0.2,-65\n");
        let concrete = rssi(Material::Concrete, "1,0.1,-70\n0,0.1,-68\n");
        let stone = rssi(Material::Stone, "0,0.1,-75\n1,0.1,-80\n1,0.2,-82\n1,0.3,-85\n");

        let series = [(Material::Wood, &wood), (Material::Concrete, &concrete), (Material::Stone, &stone)]
            .into_iter()
            .map(|(m, t)| extract_node(t, 1).map(|subset| (m, subset)))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let comparison = Comparison::side_by_side(series).unwrap();

        let tags: Vec<_> = comparison.tags().map(SeriesTag::as_str).collect();
        assert_eq!(tags, vec!["Wood", "Concrete", "Stone"]);
        assert_eq!(comparison.get("Wood").unwrap().column("rssi").unwrap(), vec![-62.0, -65.0]);
        assert_eq!(comparison.get("Concrete").unwrap().column("rssi").unwrap(), vec![-70.0]);
        assert_eq!(comparison.get("Stone").unwrap().column("distance").unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_collect_accepts_any_count() {
        assert!(Comparison::collect(Vec::<(SeriesTag, TraceTable)>::new()).is_empty());
        let one = rssi(Material::Wood, "0,1,-1\n");
        assert_eq!(Comparison::collect([("Wood", one)]).len(), 1);
    }

    #[test]
    fn test_side_by_side_needs_two() {
        let none = Comparison::side_by_side(Vec::<(SeriesTag, TraceTable)>::new());
        assert!(matches!(none, Err(TraceError::InsufficientSeries { found: 0 })));

        let one = rssi(Material::Brick, "0,1,-1\n");
        let single = Comparison::side_by_side([(Material::Brick, one)]);
        assert!(matches!(single, Err(TraceError::InsufficientSeries { found: 1 })));
    }

    #[test]
    fn test_node_series_tags() {
        let table = parse_trace("0,1,1\n1,2,2\n".as_bytes(), &TraceFormat::Mobility).unwrap();
        let comparison = node_series(&table, 3).unwrap();
        let tags: Vec<_> = comparison.tags().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["node 0", "node 1", "node 2"]);
        assert!(comparison.get("node 2").unwrap().is_empty());
    }

    #[test]
    fn test_metric_series_projects_columns() {
        let table = parse_trace(
            "SimulationSecond,Average End to End,Package Delivery Ratio\n1,,0.5\n2,0.01,0.75\n".as_bytes(),
            &TraceFormat::SanetMetrics(SanetLayout::default()),
        )
        .unwrap();
        let comparison =
            metric_series(&table, "SimulationSecond", &["Average End to End", "Package Delivery Ratio"]).unwrap();
        let pdr = comparison.get("Package Delivery Ratio").unwrap();
        assert_eq!(pdr.xy("SimulationSecond", "Package Delivery Ratio").unwrap(), vec![(1.0, 0.5), (2.0, 0.75)]);
        assert_eq!(pdr.schema().len(), 2);
        assert!(matches!(
            metric_series(&table, "SimulationSecond", &["Throughput"]),
            Err(TraceError::UnknownField(_))
        ));
    }
}
