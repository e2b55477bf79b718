//! Column-oriented opportunity time series.

use crate::error::{Result, YieldError};
use crate::table::Table;

/// Column order of an opportunity CSV: time, reference, power, wave height.
const COLUMNS: usize = 4;

/// Four equal-length, time-ordered channels.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunitySeries {
    pub time: Vec<f64>,
    /// Reference signal, e.g. a reference current or voltage.
    pub reference: Vec<f64>,
    /// Turbine power (kW); carried through, not used by the scans.
    pub power_kw: Vec<f64>,
    /// Significant wave height (m).
    pub wave_height_m: Vec<f64>,
}

impl OpportunitySeries {
    /// Builds a series from its four channels.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` if the channels differ in length.
    /// * `UnorderedSeries` if `time` is not strictly increasing.
    pub fn from_columns(
        time: Vec<f64>,
        reference: Vec<f64>,
        power_kw: Vec<f64>,
        wave_height_m: Vec<f64>,
    ) -> Result<Self> {
        let n = time.len();
        for len in [reference.len(), power_kw.len(), wave_height_m.len()] {
            if len != n {
                return Err(YieldError::DimensionMismatch {
                    context: "opportunity series channels",
                    expected: n.to_string(),
                    found: len.to_string(),
                });
            }
        }
        if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(YieldError::UnorderedSeries { index: i + 1 });
        }
        Ok(Self {
            time,
            reference,
            power_kw,
            wave_height_m,
        })
    }

    /// Splits a loaded table into channels. Extra columns are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the table has fewer than four columns,
    /// plus the errors of [`OpportunitySeries::from_columns`].
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.rows() > 0 && table.cols() < COLUMNS {
            return Err(YieldError::DimensionMismatch {
                context: "opportunity table columns",
                expected: format!("at least {COLUMNS}"),
                found: table.cols().to_string(),
            });
        }
        let column = |c: usize| table.column(c).unwrap_or_default();
        Self::from_columns(column(0), column(1), column(2), column(3))
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
