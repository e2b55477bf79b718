//! Error type shared by the yield and opportunity pipelines.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data or running an analysis.
///
/// Every variant aborts the run; nothing is retried or recovered.
#[derive(Debug, Error)]
pub enum YieldError {
    /// Two inputs that must share a shape do not.
    #[error("dimension mismatch: {context} (expected {expected}, found {found})")]
    DimensionMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },

    /// The powercurve least-squares fit did not converge.
    #[error("powercurve fit did not converge: {0}")]
    FitConvergence(String),

    /// Rotor geometry or an index falls outside the table.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// An aggregate was requested over zero samples.
    #[error("empty series: {0}")]
    EmptySeries(&'static str),

    /// Powercurve samples are unusable for fitting.
    #[error("invalid powercurve: {0}")]
    InvalidPowercurve(String),

    /// Opportunity series timestamps are not strictly increasing.
    #[error("time column not strictly increasing at sample {index}")]
    UnorderedSeries { index: usize },

    /// A CSV field could not be parsed as a number.
    #[error("parse error in {source_name} at row {row}, column {column}: \"{value}\"")]
    Parse {
        source_name: String,
        row: usize,
        column: usize,
        value: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, YieldError>;

impl YieldError {
    pub(crate) fn shape(
        context: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            context,
            expected: format!("{}x{}", expected.0, expected.1),
            found: format!("{}x{}", found.0, found.1),
        }
    }
}
