//! Power-weighted rotor average (PWRA) over a rotor's swept disk.
//!
//! Power is nonlinear in flow speed, so a rotor's output is estimated by
//! weighting each depth cell's *power* (not its velocity) by the share of
//! the rotor disk lying in that cell. Cells are 1 m tall and the disk is
//! sliced into `diameter` horizontal strips starting at its lowest point.

use std::f64::consts::PI;

use tracing::info;

use crate::error::{Result, YieldError};
use crate::table::Table;

/// Tolerance when checking that the disk bottom falls on a cell boundary.
const ALIGNMENT_EPS: f64 = 1e-9;

/// Rotor placement in the water column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorGeometry {
    /// Hub height above the seabed (m).
    pub hub_height_m: f64,
    /// Rotor diameter (m), a whole number of 1 m cells.
    pub diameter_m: u32,
}

impl RotorGeometry {
    pub fn new(hub_height_m: f64, diameter_m: u32) -> Self {
        Self {
            hub_height_m,
            diameter_m,
        }
    }

    pub fn radius_m(&self) -> f64 {
        f64::from(self.diameter_m) / 2.0
    }

    /// Height of the disk's lowest point above the seabed (m).
    pub fn bottom_height_m(&self) -> f64 {
        self.hub_height_m - self.radius_m()
    }

    /// Fraction of the disk area inside the strip `[h, h + 1)` metres above
    /// the disk bottom.
    ///
    /// Integrates the chord width `w(y) = 2·sqrt(r² − (y − r)²)` over the
    /// strip using its antiderivative and divides by `π r²`. Strips outside
    /// the disk contribute zero.
    pub fn section_area_fraction(&self, h: u32) -> f64 {
        let r = self.radius_m();
        if r <= 0.0 {
            return 0.0;
        }
        let lower = f64::from(h) - r;
        let upper = lower + 1.0;
        (chord_antiderivative(upper, r) - chord_antiderivative(lower, r)).abs() / (PI * r * r)
    }

    /// Area fractions for every strip, bottom to top.
    pub fn section_area_fractions(&self) -> Vec<f64> {
        (0..self.diameter_m)
            .map(|h| self.section_area_fraction(h))
            .collect()
    }

    /// Index of the lowest depth cell covered by the rotor in a table with
    /// `cols` cells.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the diameter is zero, the disk bottom is not
    /// on a whole-metre cell boundary, or the disk extends below the seabed
    /// or above the top cell.
    pub fn bottom_cell(&self, cols: usize) -> Result<usize> {
        if self.diameter_m == 0 {
            return Err(YieldError::OutOfRange("rotor diameter must be > 0".into()));
        }
        let bottom = self.bottom_height_m();
        if !bottom.is_finite() || (bottom - bottom.round()).abs() > ALIGNMENT_EPS {
            return Err(YieldError::OutOfRange(format!(
                "rotor bottom at {bottom} m (hub {} m, diameter {} m) is not on a 1 m cell boundary",
                self.hub_height_m, self.diameter_m
            )));
        }
        let bottom = bottom.round();
        if bottom < 0.0 {
            return Err(YieldError::OutOfRange(format!(
                "rotor bottom at {bottom} m is below the seabed"
            )));
        }
        // compared as f64 so a huge hub height cannot overflow the cast
        let top = bottom + f64::from(self.diameter_m);
        if top > cols as f64 {
            return Err(YieldError::OutOfRange(format!(
                "rotor spans cells {bottom}..{top} but the table has {cols} depth cells"
            )));
        }
        // a non-negative whole number no larger than cols
        Ok(bottom as usize)
    }

    /// Computes the PWRA series: one rotor power value per time sample.
    ///
    /// Each value is `Σ power[t][bottom + h] · section_area_fraction(h)`.
    ///
    /// # Errors
    ///
    /// See [`RotorGeometry::bottom_cell`].
    pub fn power_weighted_average(&self, power: &Table) -> Result<Vec<f64>> {
        let bottom = self.bottom_cell(power.cols())?;
        info!(
            diameter_m = self.diameter_m,
            hub_height_m = self.hub_height_m,
            samples = power.rows(),
            "calculating PWRA"
        );
        let weights = self.section_area_fractions();
        let series = (0..power.rows())
            .map(|t| {
                let cells = &power.row(t)[bottom..bottom + weights.len()];
                cells.iter().zip(&weights).map(|(p, w)| p * w).sum()
            })
            .collect();
        Ok(series)
    }
}

/// Antiderivative of `2·sqrt(r² − u²)`, with `u` clamped to `[-r, r]`.
fn chord_antiderivative(u: f64, r: f64) -> f64 {
    let u = u.clamp(-r, r);
    u * (r * r - u * u).max(0.0).sqrt() + r * r * (u / r).asin()
}
