//! Combines east/north velocity components into flow speed.

use crate::error::{Result, YieldError};
use crate::table::Table;

/// Returns a table of flow speed, `sqrt(east² + north²)`, per cell.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the component tables differ in shape.
pub fn combine_components(east: &Table, north: &Table) -> Result<Table> {
    if east.shape() != north.shape() {
        return Err(YieldError::shape(
            "east and north component tables",
            east.shape(),
            north.shape(),
        ));
    }
    let (rows, cols) = east.shape();
    Ok(Table::from_fn(rows, cols, |r, c| {
        let u = east.row(r)[c];
        let v = north.row(r)[c];
        (u * u + v * v).sqrt()
    }))
}
