//! CSV loaders for velocity tables, powercurves and opportunity series.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::energy::PowercurveSample;
use crate::error::{Result, YieldError};
use crate::opportunity::OpportunitySeries;
use crate::table::Table;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| YieldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_field(value: &str, source_name: &str, row: usize, column: usize) -> Result<f64> {
    value.parse::<f64>().map_err(|_| YieldError::Parse {
        source_name: source_name.to_string(),
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_records<R: Read>(
    reader: csv::Reader<R>,
    source_name: &str,
    first_row: usize,
) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, record) in reader.into_records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(c, field)| parse_field(field, source_name, first_row + i, c + 1))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Reads a headerless numeric CSV into a [`Table`].
///
/// # Arguments
///
/// * `reader` - CSV source
/// * `source_name` - Label used in parse errors
///
/// # Errors
///
/// Returns `Parse` for a non-numeric field and `DimensionMismatch` for
/// rows of unequal length.
pub fn read_table_from<R: Read>(reader: R, source_name: &str) -> Result<Table> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let table = Table::from_rows(parse_records(rdr, source_name, 1)?)?;
    debug!(source = source_name, rows = table.rows(), cols = table.cols(), "loaded table");
    Ok(table)
}

/// Reads a headerless numeric CSV file into a [`Table`].
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, otherwise as
/// [`read_table_from`].
pub fn read_table(path: &Path) -> Result<Table> {
    read_table_from(open(path)?, &path.display().to_string())
}

/// Reads `velocity,power` pairs, discarding the header row.
///
/// # Errors
///
/// Returns `Parse` for a non-numeric field and `InvalidPowercurve` for a
/// row with fewer than two fields.
pub fn read_powercurve_from<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<PowercurveSample>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    parse_records(rdr, source_name, 2)?
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [velocity, power, ..] => Ok(PowercurveSample::new(*velocity, *power)),
            _ => Err(YieldError::InvalidPowercurve(format!(
                "{source_name} row {} needs velocity and power columns",
                i + 2
            ))),
        })
        .collect()
}

/// Reads a powercurve CSV file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, otherwise as
/// [`read_powercurve_from`].
pub fn read_powercurve(path: &Path) -> Result<Vec<PowercurveSample>> {
    read_powercurve_from(open(path)?, &path.display().to_string())
}

/// Reads a headerless `time,reference,power,wave` CSV file.
///
/// # Errors
///
/// As [`read_table`] and [`OpportunitySeries::from_table`].
pub fn read_opportunity_series(path: &Path) -> Result<OpportunitySeries> {
    OpportunitySeries::from_table(&read_table(path)?)
}
