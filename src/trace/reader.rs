//! Trace readers: turn a simulator trace file into a `TraceTable`.
//!
//! All four formats share one reader. They differ only in their schema,
//! header policy and whether empty numeric cells default to zero:
//!
//! | Format        | Schema                        | Header   | Timestamp |
//! |---------------|-------------------------------|----------|-----------|
//! | Mobility      | node, x, y                    | optional | -         |
//! | RSSI-distance | node, distance, rssi          | none     | -         |
//! | RSSI-time     | seconds, rssi                 | none     | seconds   |
//! | SANET metrics | SimulationSecond, metrics...  | required | -         |

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::error::TraceError;
use super::timestamp::normalize_timestamp;
use super::types::{Field, FieldKind, Material, Record, Schema, TraceTable, Value};

/// Default time column of the SANET performance CSV.
pub const SANET_TIME_COLUMN: &str = "SimulationSecond";

/// Non-numeric SANET columns, passed through as text.
pub const SANET_TEXT_COLUMNS: &[&str] = &["RoutingProtocol"];

/// Column layout of a SANET metrics CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanetLayout {
    /// Name the first header column must carry.
    pub time_column: String,
    /// Header columns holding text rather than numbers.
    pub text_columns: Vec<String>,
}

impl Default for SanetLayout {
    fn default() -> Self {
        Self {
            time_column: SANET_TIME_COLUMN.to_string(),
            text_columns: SANET_TEXT_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Input trace formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceFormat {
    /// Node positions: `node, x, y`.
    Mobility,
    /// Received signal strength against distance for one wall material.
    RssiDistance(Material),
    /// Received signal strength against simulator time.
    RssiTime,
    /// SANET performance metrics, one row per simulated second.
    SanetMetrics(SanetLayout),
}

/// How the first row of a file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderPolicy {
    /// Every row is data.
    Absent,
    /// The first row names the columns and defines the schema.
    Required,
    /// The first row is skipped only if it repeats the schema field names.
    Optional,
}

impl TraceFormat {
    /// Schema of formats whose columns are known up front.
    ///
    /// SANET tables take their schema from the file header and return `None`.
    pub fn fixed_schema(&self) -> Option<Schema> {
        match self {
            TraceFormat::Mobility => Some(mobility_schema()),
            TraceFormat::RssiDistance(_) => Some(rssi_distance_schema()),
            TraceFormat::RssiTime => Some(rssi_time_schema()),
            TraceFormat::SanetMetrics(_) => None,
        }
    }

    fn header_policy(&self) -> HeaderPolicy {
        match self {
            TraceFormat::Mobility => HeaderPolicy::Optional,
            TraceFormat::RssiDistance(_) | TraceFormat::RssiTime => HeaderPolicy::Absent,
            TraceFormat::SanetMetrics(_) => HeaderPolicy::Required,
        }
    }

    /// Only SANET metrics substitute zero for a missing numeric cell.
    fn defaults_missing_to_zero(&self) -> bool {
        matches!(self, TraceFormat::SanetMetrics(_))
    }

    fn name(&self) -> &'static str {
        match self {
            TraceFormat::Mobility => "mobility",
            TraceFormat::RssiDistance(_) => "rssi-distance",
            TraceFormat::RssiTime => "rssi-time",
            TraceFormat::SanetMetrics(_) => "sanet",
        }
    }
}

fn mobility_schema() -> Schema {
    Schema::new(vec![
        Field::new("node", FieldKind::Node),
        Field::new("x", FieldKind::Number),
        Field::new("y", FieldKind::Number),
    ])
}

fn rssi_distance_schema() -> Schema {
    Schema::new(vec![
        Field::new("node", FieldKind::Node),
        Field::new("distance", FieldKind::Number),
        Field::new("rssi", FieldKind::Number),
    ])
}

fn rssi_time_schema() -> Schema {
    Schema::new(vec![
        Field::new("seconds", FieldKind::Timestamp),
        Field::new("rssi", FieldKind::Number),
    ])
}

/// Read a mobility trace (`node, x, y`).
pub fn read_mobility(path: impl AsRef<Path>) -> Result<TraceTable, TraceError> {
    read_trace(path, &TraceFormat::Mobility)
}

/// Read the RSSI-distance trace recorded behind one wall material.
pub fn read_rssi_distance(path: impl AsRef<Path>, material: Material) -> Result<TraceTable, TraceError> {
    read_trace(path, &TraceFormat::RssiDistance(material))
}

/// Read an RSSI-time trace. The `seconds` column holds nanoseconds.
pub fn read_rssi_time(path: impl AsRef<Path>) -> Result<TraceTable, TraceError> {
    read_trace(path, &TraceFormat::RssiTime)
}

/// Read a SANET metrics CSV with the default column layout.
pub fn read_sanet(path: impl AsRef<Path>) -> Result<TraceTable, TraceError> {
    read_trace(path, &TraceFormat::SanetMetrics(SanetLayout::default()))
}

/// Read a trace file in the given format.
///
/// The file is fully consumed and closed before returning, on success and on
/// every error path.
///
/// # Returns
///
/// A fresh table, or `SourceNotFound` if the path does not exist, `Io` on
/// other read failures, and any error `parse_trace` raises.
pub fn read_trace(path: impl AsRef<Path>, format: &TraceFormat) -> Result<TraceTable, TraceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TraceError::SourceNotFound(path.to_path_buf()),
        _ => TraceError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let table = parse_trace(file, format).map_err(|e| match e {
        TraceError::Read(source) => TraceError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    log::debug!("Read {} {} rows from {}", table.len(), format.name(), path.display());
    Ok(table)
}

/// Parse delimited trace text from any byte source.
///
/// Fails with `SchemaMismatch` if a row width differs from the schema,
/// `MalformedTimestamp` or `MalformedField` if a cell cannot be normalized.
/// Blank lines are skipped. No partial table is ever returned.
pub fn parse_trace<R: Read>(source: R, format: &TraceFormat) -> Result<TraceTable, TraceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut rows = reader
        .records()
        .filter(|row| !matches!(row, Ok(record) if is_blank(record)))
        .peekable();

    let schema = match format {
        TraceFormat::SanetMetrics(layout) => {
            let header = match rows.next() {
                Some(row) => row.map_err(csv_error)?,
                None => {
                    return Err(TraceError::SchemaMismatch {
                        row: 1,
                        expected: 2,
                        found: 0,
                    });
                }
            };
            sanet_schema(&header, layout)?
        }
        TraceFormat::Mobility => mobility_schema(),
        TraceFormat::RssiDistance(_) => rssi_distance_schema(),
        TraceFormat::RssiTime => rssi_time_schema(),
    };

    if format.header_policy() == HeaderPolicy::Optional {
        if let Some(Ok(first)) = rows.peek() {
            if is_header_row(first, &schema) {
                log::debug!("Skipping {} header row", format.name());
                rows.next();
            }
        }
    }

    let defaults = format.defaults_missing_to_zero();
    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(csv_error)?;
        let line = row_number(&row);
        if row.len() != schema.len() {
            return Err(TraceError::SchemaMismatch {
                row: line,
                expected: schema.len(),
                found: row.len(),
            });
        }
        let values = schema
            .fields()
            .iter()
            .zip(row.iter())
            .map(|(field, raw)| normalize_field(field, raw, line, defaults))
            .collect::<Result<Vec<_>, _>>()?;
        records.push(Record::new(values));
    }

    TraceTable::new(schema, records)
}

/// Build the SANET schema from its header row.
fn sanet_schema(header: &csv::StringRecord, layout: &SanetLayout) -> Result<Schema, TraceError> {
    if header.len() < 2 {
        return Err(TraceError::SchemaMismatch {
            row: row_number(header),
            expected: 2,
            found: header.len(),
        });
    }
    if header.get(0) != Some(layout.time_column.as_str()) {
        return Err(TraceError::UnknownField(layout.time_column.clone()));
    }

    let fields = header
        .iter()
        .map(|name| {
            let kind = if layout.text_columns.iter().any(|t| t == name) {
                FieldKind::Text
            } else {
                FieldKind::Number
            };
            Field::new(name, kind)
        })
        .collect();
    Ok(Schema::new(fields))
}

/// Empty cell, or the `nan`/`-nan` the simulator prints for a 0/0 ratio.
fn is_missing(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("-nan")
}

/// A line that held nothing but whitespace.
fn is_blank(row: &csv::StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(str::is_empty)
}

fn is_header_row(row: &csv::StringRecord, schema: &Schema) -> bool {
    row.len() == schema.len() && row.iter().zip(schema.names()).all(|(cell, name)| cell.eq_ignore_ascii_case(name))
}

/// Normalize one raw cell according to its field kind.
fn normalize_field(field: &Field, raw: &str, row: usize, default_missing: bool) -> Result<Value, TraceError> {
    let malformed = || TraceError::MalformedField {
        row,
        field: field.name.clone(),
        value: raw.to_string(),
    };

    match field.kind {
        FieldKind::Text => Ok(Value::Text(raw.to_string())),
        FieldKind::Timestamp => normalize_timestamp(raw).map(Value::Number),
        FieldKind::Node => raw.parse::<u32>().map(Value::Node).map_err(|_| malformed()),
        FieldKind::Number => {
            if default_missing && is_missing(raw) {
                return Ok(Value::Number(0.0));
            }
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Value::Number(v)),
                _ => Err(malformed()),
            }
        }
    }
}

fn row_number(row: &csv::StringRecord) -> usize {
    row.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn csv_error(e: csv::Error) -> TraceError {
    let row = e.position().map(|p| p.line() as usize).unwrap_or(0);
    match e.into_kind() {
        csv::ErrorKind::Io(source) => TraceError::Read(source),
        csv::ErrorKind::Utf8 { err, .. } => TraceError::MalformedField {
            row,
            field: format!("#{}", err.field() + 1),
            value: "<invalid utf-8>".to_string(),
        },
        _ => TraceError::MalformedField {
            row,
            field: String::new(),
            value: "<unreadable row>".to_string(),
        },
    }
}
