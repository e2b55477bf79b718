//! Per-rotor yield results and the printable yield report.

use std::fmt;

use super::aggregate::{capacity_factor, duration_hours, total_energy_kwh};
use super::flow::FlowSummary;
use super::powercurve::FittedPowercurve;
use super::rotor::RotorGeometry;
use crate::error::Result;
use crate::table::Table;

/// Yield of one rotor model over the measurement period.
#[derive(Debug, Clone)]
pub struct RotorYield {
    /// Label used in reports and CSV headers.
    pub name: String,
    pub geometry: RotorGeometry,
    pub curve: FittedPowercurve,
    /// PWRA power, one value per time sample (kW).
    pub power_kw: Vec<f64>,
    /// Energy over the period (kWh).
    pub total_energy_kwh: f64,
    /// Energy relative to running at rated power throughout.
    pub capacity_factor: f64,
}

impl RotorYield {
    /// Runs the speed → power → PWRA → energy chain for one rotor.
    ///
    /// # Arguments
    ///
    /// * `name` - Rotor label
    /// * `geometry` - Hub height and diameter
    /// * `curve` - Fitted powercurve for this rotor model
    /// * `speed` - Flow-speed table (rows = samples, cols = 1 m cells)
    /// * `sample_rate_hours` - Sample interval in hours
    ///
    /// # Errors
    ///
    /// Propagates `OutOfRange` from the rotor geometry and `EmptySeries`
    /// from the aggregator.
    pub fn compute(
        name: impl Into<String>,
        geometry: RotorGeometry,
        curve: FittedPowercurve,
        speed: &Table,
        sample_rate_hours: f64,
    ) -> Result<Self> {
        let power_table = curve.map_table(speed);
        let power_kw = geometry.power_weighted_average(&power_table)?;
        let total_energy_kwh = total_energy_kwh(&power_kw, sample_rate_hours)?;
        let capacity_factor = capacity_factor(
            total_energy_kwh,
            curve.rated_power_kw,
            duration_hours(power_kw.len(), sample_rate_hours),
        )?;
        Ok(Self {
            name: name.into(),
            geometry,
            curve,
            power_kw,
            total_energy_kwh,
            capacity_factor,
        })
    }

    /// Highest PWRA power in the period (kW).
    pub fn peak_power_kw(&self) -> f64 {
        self.power_kw.iter().copied().fold(0.0, f64::max)
    }
}

/// Results of the energy pipeline for every configured rotor.
#[derive(Debug, Clone)]
pub struct YieldReport {
    /// Number of time samples in the velocity tables.
    pub samples: usize,
    pub sample_rate_hours: f64,
    pub flow: FlowSummary,
    pub rotors: Vec<RotorYield>,
}

impl YieldReport {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(self.samples, self.sample_rate_hours)
    }
}

impl fmt::Display for YieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Yield Report ---")?;
        writeln!(
            f,
            "Period:                {} samples ({:.1} h)",
            self.samples,
            self.duration_hours()
        )?;
        writeln!(f, "Mean flow speed:       {:.3} m/s", self.flow.mean_speed_ms)?;
        writeln!(f, "Peak flow speed:       {:.3} m/s", self.flow.peak_speed_ms)?;
        write!(
            f,
            "Mean daily max flow:   {:.3} m/s ({} days)",
            self.flow.mean_daily_max_ms, self.flow.days
        )?;
        for r in &self.rotors {
            writeln!(f)?;
            writeln!(
                f,
                "\n[{}] {} m rotor, hub {:.1} m",
                r.name, r.geometry.diameter_m, r.geometry.hub_height_m
            )?;
            writeln!(f, "Powercurve fit:        {}", r.curve)?;
            writeln!(f, "Rated power:           {:.2} kW", r.curve.rated_power_kw)?;
            writeln!(f, "Peak rotor power:      {:.2} kW", r.peak_power_kw())?;
            writeln!(f, "Total energy:          {:.2} kWh", r.total_energy_kwh)?;
            write!(f, "Capacity factor:       {:.4}", r.capacity_factor)?;
        }
        Ok(())
    }
}
