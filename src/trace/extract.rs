//! Per-node extraction from keyed trace tables.

use super::error::TraceError;
use super::types::TraceTable;

/// Subset of `table` whose node key equals `node`, in original order.
///
/// # Returns
///
/// A new table (possibly empty) with the parent schema. Fails with
/// `InvalidNodeId` for a negative id and `MissingNodeKey` if the table has
/// no node column. A node that never appears is not an error.
pub fn extract_node(table: &TraceTable, node: i64) -> Result<TraceTable, TraceError> {
    let node = u32::try_from(node).map_err(|_| TraceError::InvalidNodeId(node))?;
    let key = table.schema().key_index().ok_or(TraceError::MissingNodeKey)?;

    Ok(table.filtered(|record| record.get(key).and_then(|v| v.as_node()) == Some(node)))
}

/// Subsets for node ids `0..count`, in ascending id order.
///
/// Nodes absent from the table yield empty subsets so every id in the range
/// gets a series.
pub fn node_subsets(table: &TraceTable, count: u32) -> Result<Vec<(u32, TraceTable)>, TraceError> {
    (0..count)
        .map(|id| extract_node(table, i64::from(id)).map(|subset| (id, subset)))
        .collect()
}
