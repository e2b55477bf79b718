//! Tidal-turbine energy yield and maintenance-window analysis from
//! measured current data.

pub mod config;
/// Flow speed, powercurve, rotor weighting and energy totals.
pub mod energy;
pub mod error;
pub mod io;
/// Maintenance opportunity-window scans.
pub mod opportunity;
pub mod pipeline;
pub mod table;

pub use error::{Result, YieldError};
