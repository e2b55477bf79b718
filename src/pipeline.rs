//! Config-driven orchestration of the yield and opportunity analyses.

use tracing::info;

use crate::config::{AnalysisConfig, EnergyConfig, RotorConfig};
use crate::energy::flow::{FlowSummary, mean_speed_series};
use crate::energy::velocity::combine_components;
use crate::energy::{FittedPowercurve, PowercurveSample, RotorYield, YieldReport};
use crate::error::{Result, YieldError};
use crate::io::table::{read_opportunity_series, read_powercurve, read_table};
use crate::opportunity::{OpportunityReport, OpportunitySeries};
use crate::table::Table;

/// Everything the energy pipeline produces for one run.
#[derive(Debug, Clone)]
pub struct EnergyOutcome {
    pub report: YieldReport,
    /// Depth-averaged flow speed per sample (m/s).
    pub mean_speed_ms: Vec<f64>,
    /// Reference powercurve samples, parallel to `report.rotors`.
    pub reference_curves: Vec<Vec<PowercurveSample>>,
}

impl EnergyOutcome {
    /// `(name, samples, fitted curve)` per rotor, for curve export.
    pub fn curve_rows(&self) -> Vec<(&str, &[PowercurveSample], &FittedPowercurve)> {
        self.report
            .rotors
            .iter()
            .zip(&self.reference_curves)
            .map(|(r, samples)| (r.name.as_str(), samples.as_slice(), &r.curve))
            .collect()
    }
}

/// Runs the energy pipeline on tables already in memory.
///
/// # Arguments
///
/// * `east` - East velocity component table
/// * `north` - North velocity component table
/// * `rotors` - Rotor configuration with its reference powercurve samples
/// * `energy` - Sampling parameters
///
/// # Errors
///
/// Returns the first error raised by any stage; nothing is partially
/// reported.
pub fn analyze_energy(
    east: &Table,
    north: &Table,
    rotors: &[(RotorConfig, Vec<PowercurveSample>)],
    energy: &EnergyConfig,
) -> Result<EnergyOutcome> {
    let speed = combine_components(east, north)?;
    if speed.is_empty() {
        return Err(YieldError::EmptySeries("velocity tables"));
    }
    let mean_speed_ms = mean_speed_series(&speed);
    let flow = FlowSummary::from_mean_series(&mean_speed_ms, energy.samples_per_day);

    let mut results = Vec::with_capacity(rotors.len());
    for (rotor, samples) in rotors {
        let curve = FittedPowercurve::fit(samples)?;
        info!(
            rotor = %rotor.name,
            curve = %curve,
            iterations = curve.iterations,
            "fitted powercurve"
        );
        let y = RotorYield::compute(
            rotor.name.clone(),
            rotor.geometry(),
            curve,
            &speed,
            energy.sample_rate_hours,
        )?;
        info!(
            rotor = %y.name,
            energy_kwh = y.total_energy_kwh,
            capacity_factor = y.capacity_factor,
            "rotor yield"
        );
        results.push(y);
    }

    Ok(EnergyOutcome {
        report: YieldReport {
            samples: speed.rows(),
            sample_rate_hours: energy.sample_rate_hours,
            flow,
            rotors: results,
        },
        mean_speed_ms,
        reference_curves: rotors.iter().map(|(_, s)| s.clone()).collect(),
    })
}

/// Loads every input named by `cfg` and runs the energy pipeline.
///
/// # Errors
///
/// Propagates loader errors and any error from [`analyze_energy`].
pub fn run_energy(cfg: &AnalysisConfig) -> Result<EnergyOutcome> {
    let east_path = cfg.resolve(&cfg.energy.east_path);
    let north_path = cfg.resolve(&cfg.energy.north_path);
    info!(path = %east_path.display(), "loading east component table");
    let east = read_table(&east_path)?;
    info!(path = %north_path.display(), "loading north component table");
    let north = read_table(&north_path)?;

    let rotors = cfg
        .rotors
        .iter()
        .map(|r| {
            let path = cfg.resolve(&r.powercurve_path);
            info!(rotor = %r.name, path = %path.display(), "loading powercurve");
            Ok((r.clone(), read_powercurve(&path)?))
        })
        .collect::<Result<Vec<_>>>()?;

    analyze_energy(&east, &north, &rotors, &cfg.energy)
}

/// Scans a series with both configured maintenance policies.
pub fn analyze_opportunities(
    series: &OpportunitySeries,
    cfg: &AnalysisConfig,
) -> OpportunityReport {
    let o = &cfg.opportunity;
    let report =
        OpportunityReport::from_series(series, o.sample_rate_hours, o.sensor_check, o.repair);
    info!(
        samples = report.samples,
        sensor_check = report.sensor_check.count(),
        repair = report.repair.count(),
        "opportunity scan complete"
    );
    report
}

/// Loads the opportunity series named by `cfg` and scans it.
///
/// # Errors
///
/// Propagates loader and series validation errors.
pub fn run_opportunity(cfg: &AnalysisConfig) -> Result<OpportunityReport> {
    let path = cfg.resolve(&cfg.opportunity.series_path);
    info!(path = %path.display(), "loading opportunity series");
    let series = read_opportunity_series(&path)?;
    Ok(analyze_opportunities(&series, cfg))
}
