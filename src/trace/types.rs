//! Type definitions shared by the trace readers, extractor and aggregator.
//!
//! A `TraceTable` is created once by a reader and never mutated afterwards.
//! Every derived view (node subsets, projections, comparisons) is a new table.

use std::fmt;

use super::error::TraceError;

/// A single normalized cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Node identifier (the table key).
    Node(u32),
    /// Numeric measurement, or a normalized timestamp.
    Number(f64),
    /// Non-numeric field passed through unchanged.
    Text(String),
}

impl Value {
    /// Numeric view of the cell. Node ids widen to `f64`, text yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Node(id) => Some(*id as f64),
            Value::Number(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<u32> {
        match self {
            Value::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this cell may appear in a field of `kind`.
    fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Value::Node(_), FieldKind::Node)
                | (Value::Number(_), FieldKind::Number | FieldKind::Timestamp)
                | (Value::Text(_), FieldKind::Text)
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Node(id) => write!(f, "{id}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// How a field's raw text is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer node id.
    Node,
    /// Floating-point measurement.
    Number,
    /// Simulator timestamp token, normalized to nanoseconds.
    Timestamp,
    /// Free text, kept verbatim.
    Text,
}

/// Named, typed column of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind }
    }
}

/// Ordered field list, fixed when the table is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Position of the named field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Position of the node key: the first `Node` field, if any.
    pub fn key_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.kind == FieldKind::Node)
    }
}

/// One normalized row. Values are positionally aligned with the table schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Ordered sequence of records sharing one schema.
///
/// Row order is file order. The table is read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceTable {
    schema: Schema,
    records: Vec<Record>,
}

impl TraceTable {
    /// Build a table, checking every record against the schema width and
    /// field kinds.
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self, TraceError> {
        for (idx, record) in records.iter().enumerate() {
            if record.values.len() != schema.len() {
                return Err(TraceError::SchemaMismatch {
                    row: idx + 1,
                    expected: schema.len(),
                    found: record.values.len(),
                });
            }
            for (field, value) in schema.fields.iter().zip(&record.values) {
                if !value.fits(field.kind) {
                    return Err(TraceError::MalformedField {
                        row: idx + 1,
                        field: field.name.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(Self { schema, records })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Node id of each record, in order. `None` if the table has no node key.
    pub fn node_ids(&self) -> Option<impl Iterator<Item = u32> + '_> {
        let key = self.schema.key_index()?;
        Some(self.records.iter().filter_map(move |r| r.values[key].as_node()))
    }

    /// Distinct node ids in first-seen order. Empty for unkeyed tables.
    pub fn nodes(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        if let Some(ids) = self.node_ids() {
            for id in ids {
                if !seen.contains(&id) {
                    seen.push(id);
                }
            }
        }
        seen
    }

    /// Numeric column by name.
    ///
    /// Fails with `UnknownField` if the schema lacks the column and with
    /// `MalformedField` if the column holds text.
    pub fn column(&self, name: &str) -> Result<Vec<f64>, TraceError> {
        let idx = self.field_index(name)?;
        self.records
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r.values[idx].as_f64().ok_or_else(|| TraceError::MalformedField {
                    row: row + 1,
                    field: name.to_string(),
                    value: r.values[idx].to_string(),
                })
            })
            .collect()
    }

    /// `(x, y)` pairs for two numeric columns, in row order.
    pub fn xy(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>, TraceError> {
        let xs = self.column(x)?;
        let ys = self.column(y)?;
        Ok(xs.into_iter().zip(ys).collect())
    }

    /// Projection onto the named fields, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<TraceTable, TraceError> {
        let indices = names.iter().map(|n| self.field_index(n)).collect::<Result<Vec<_>, _>>()?;
        let schema = Schema::new(indices.iter().map(|&i| self.schema.fields[i].clone()).collect());
        let records = self
            .records
            .iter()
            .map(|r| Record::new(indices.iter().map(|&i| r.values[i].clone()).collect()))
            .collect();
        Ok(TraceTable { schema, records })
    }

    /// New table with the same schema holding the records that pass `keep`.
    pub(crate) fn filtered<F>(&self, mut keep: F) -> TraceTable
    where
        F: FnMut(&Record) -> bool,
    {
        TraceTable {
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    fn field_index(&self, name: &str) -> Result<usize, TraceError> {
        self.schema.index_of(name).ok_or_else(|| TraceError::UnknownField(name.to_string()))
    }
}

/// Wall material of the RSSI-distance experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Wood,
    Concrete,
    Stone,
    Brick,
}

impl Material {
    /// Lowercase name used in trace file names (`rssi_building_<name>.txt`).
    pub fn file_stem(self) -> &'static str {
        match self {
            Material::Wood => "wood",
            Material::Concrete => "concrete",
            Material::Stone => "stone",
            Material::Brick => "brick",
        }
    }

    /// Display label used when the material tags a comparison series.
    pub fn label(self) -> &'static str {
        match self {
            Material::Wood => "Wood",
            Material::Concrete => "Concrete",
            Material::Stone => "Stone",
            Material::Brick => "Brick",
        }
    }
}

/// Descriptive label attached to a table inside a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesTag(String);

impl SeriesTag {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Material> for SeriesTag {
    fn from(m: Material) -> Self {
        SeriesTag(m.label().to_string())
    }
}

impl From<&str> for SeriesTag {
    fn from(s: &str) -> Self {
        SeriesTag(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TraceTable {
        let schema = Schema::new(vec![
            Field::new("node", FieldKind::Node),
            Field::new("x", FieldKind::Number),
            Field::new("y", FieldKind::Number),
        ]);
        let rows = vec![
            Record::new(vec![Value::Node(1), Value::Number(2.0), Value::Number(3.0)]),
            Record::new(vec![Value::Node(0), Value::Number(4.0), Value::Number(5.0)]),
            Record::new(vec![Value::Node(1), Value::Number(6.0), Value::Number(7.0)]),
        ];
        TraceTable::new(schema, rows).unwrap()
    }

    #[test]
    fn test_new_rejects_ragged_record() {
        let schema = Schema::new(vec![Field::new("node", FieldKind::Node), Field::new("x", FieldKind::Number)]);
        let err = TraceTable::new(schema, vec![Record::new(vec![Value::Node(0)])]).unwrap_err();
        assert!(matches!(err, TraceError::SchemaMismatch { row: 1, expected: 2, found: 1 }));
    }

    #[test]
    fn test_new_rejects_mixed_key_column() {
        let schema = Schema::new(vec![Field::new("node", FieldKind::Node), Field::new("x", FieldKind::Number)]);
        let rows = vec![
            Record::new(vec![Value::Node(0), Value::Number(1.0)]),
            Record::new(vec![Value::Text("1".into()), Value::Number(2.0)]),
        ];
        let err = TraceTable::new(schema.clone(), rows).unwrap_err();
        assert!(matches!(err, TraceError::MalformedField { row: 2, ref field, ref value } if field == "node" && value == "1"));

        let numeric_key = vec![Record::new(vec![Value::Number(3.0), Value::Number(2.0)])];
        assert!(matches!(
            TraceTable::new(schema, numeric_key),
            Err(TraceError::MalformedField { row: 1, .. })
        ));
    }

    #[test]
    fn test_new_rejects_node_in_number_column() {
        let schema = Schema::new(vec![Field::new("seconds", FieldKind::Timestamp)]);
        assert!(TraceTable::new(schema.clone(), vec![Record::new(vec![Value::Number(1.5)])]).is_ok());
        assert!(matches!(
            TraceTable::new(schema, vec![Record::new(vec![Value::Node(1)])]),
            Err(TraceError::MalformedField { .. })
        ));
    }

    #[test]
    fn test_nodes_first_seen_order() {
        assert_eq!(sample().nodes(), vec![1, 0]);
    }

    #[test]
    fn test_column_and_xy() {
        let table = sample();
        assert_eq!(table.column("x").unwrap(), vec![2.0, 4.0, 6.0]);
        assert_eq!(table.xy("x", "y").unwrap()[2], (6.0, 7.0));
        assert!(matches!(table.column("z"), Err(TraceError::UnknownField(_))));
    }

    #[test]
    fn test_select_projects_schema_and_rows() {
        let table = sample();
        let projected = table.select(&["y", "node"]).unwrap();
        assert_eq!(projected.schema().names().collect::<Vec<_>>(), vec!["y", "node"]);
        assert_eq!(projected.records()[1].values(), &[Value::Number(5.0), Value::Node(0)]);
        assert_eq!(table.schema().len(), 3);
    }

    #[test]
    fn test_text_column_is_not_numeric() {
        let schema = Schema::new(vec![Field::new("RoutingProtocol", FieldKind::Text)]);
        let table = TraceTable::new(schema, vec![Record::new(vec![Value::Text("AODV".into())])]).unwrap();
        assert!(matches!(table.column("RoutingProtocol"), Err(TraceError::MalformedField { row: 1, .. })));
    }

    #[test]
    fn test_material_labels() {
        assert_eq!(SeriesTag::from(Material::Concrete).as_str(), "Concrete");
        assert_eq!(Material::Stone.file_stem(), "stone");
    }
}
